//! Vehicle access classes used by HERE access (`AR_*`) and usage-fee
//! (`UFR_*`) fields.

/// One vehicle category of a HERE access-restriction row.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessClass {
    Auto,
    Bus,
    Taxis,
    Carpool,
    Pedestrian,
    Trucks,
    ThroughTraffic,
    Delivery,
    Emergency,
    Motorcycle,
}

impl AccessClass {
    pub const ALL: [AccessClass; 10] = [
        AccessClass::Auto,
        AccessClass::Bus,
        AccessClass::Taxis,
        AccessClass::Carpool,
        AccessClass::Pedestrian,
        AccessClass::Trucks,
        AccessClass::ThroughTraffic,
        AccessClass::Delivery,
        AccessClass::Emergency,
        AccessClass::Motorcycle,
    ];

    /// Column suffix shared by `AR_<suffix>` and `UFR_<suffix>`.
    pub fn suffix(self) -> &'static str {
        match self {
            AccessClass::Auto           => "AUTO",
            AccessClass::Bus            => "BUS",
            AccessClass::Taxis          => "TAXIS",
            AccessClass::Carpool        => "CARPOOL",
            AccessClass::Pedestrian     => "PEDSTRN",
            AccessClass::Trucks         => "TRUCKS",
            AccessClass::ThroughTraffic => "THRUTR",
            AccessClass::Delivery       => "DELIVER",
            AccessClass::Emergency      => "EMERVEH",
            AccessClass::Motorcycle     => "MOTOR",
        }
    }

    pub fn access_field(self) -> String {
        format!("AR_{}", self.suffix())
    }

    pub fn usage_fee_field(self) -> String {
        format!("UFR_{}", self.suffix())
    }
}

impl std::fmt::Display for AccessClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}
