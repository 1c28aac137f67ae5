//! Vendor restriction vocabularies.
//!
//! Each vendor encodes restrictions as small integer or two-character codes.
//! The tables here translate those codes into canonical field names and
//! convert raw limit values into metric units.  Anything not listed maps
//! to `None`, which callers treat as a no-op.

use sdp_core::Direction;
use sdp_network::AttrValue;

use crate::record::DirectionCategory;

/// One interpreted modifier row: what to write and how to direct it.
#[derive(Clone, Debug, PartialEq)]
pub struct ModifierEffect {
    pub field: &'static str,
    pub value: AttrValue,
    /// `None` writes the field undirected.
    pub category: Option<DirectionCategory>,
}

impl ModifierEffect {
    fn directed(field: &'static str, value: AttrValue, category: DirectionCategory) -> Self {
        Self { field, value, category: Some(category) }
    }
}

// ── HERE NAVSTREETS ───────────────────────────────────────────────────────────

pub mod here {
    use super::*;

    pub const PREFERRED_DIRECTION: i64 = 60;
    pub const PROHIBITED_DIRECTION: i64 = 38;
    pub const HAZMAT_PROHIBITED: i64 = 39;
    pub const HEIGHT: i64 = 41;
    pub const WEIGHT: i64 = 42;
    pub const WEIGHT_PER_AXLE: i64 = 43;
    pub const LENGTH: i64 = 44;
    pub const WIDTH: i64 = 45;
    pub const TRAILERS: i64 = 46;
    pub const TRUCK_SPEED: i64 = 48;
    pub const HAZMAT_PERMITTED: i64 = 49;
    pub const AXLES: i64 = 75;
    pub const KINGPIN: i64 = 81;

    /// Modifier types read from the `CndMod` tables.
    pub const MODIFIER_TYPES: [i64; 13] = [38, 39, 41, 42, 43, 44, 45, 46, 48, 49, 60, 75, 81];

    /// `Cdms` condition types whose modifiers apply to streets.
    pub const STREET_CONDITION_TYPES: [i64; 3] = [23, 25, 27];

    pub const CONSTRUCTION_CONDITION: i64 = 3;
    pub const TURN_CONDITION_TYPES: [i64; 2] = [4, 7];
    pub const FORK_CONDITION: i64 = 9;
    pub const USAGE_FEE_CONDITION: i64 = 12;
    pub const TRANSPORT_CONDITION: i64 = 26;

    /// Region of a `CndMod` table; decides the source units.
    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    pub enum UnitSystem {
        /// Inches, pounds, miles per hour.
        Us,
        /// Centimetres, kilograms, kilometres per hour.
        Metric,
    }

    /// Value of a direction indicator row, or `None` for other types.
    pub fn indicator(mod_type: i64, value: &str) -> Option<(DirectionCategory, Direction)> {
        match (mod_type, value) {
            (PREFERRED_DIRECTION, "1") => Some((DirectionCategory::Preferred, Direction::FromTo)),
            (PREFERRED_DIRECTION, "2") => Some((DirectionCategory::Preferred, Direction::ToFrom)),
            (PREFERRED_DIRECTION, "3") => Some((DirectionCategory::Preferred, Direction::Both)),
            (PROHIBITED_DIRECTION, "1") => Some((DirectionCategory::Prohibited, Direction::Both)),
            (PROHIBITED_DIRECTION, "2") => Some((DirectionCategory::Prohibited, Direction::FromTo)),
            (PROHIBITED_DIRECTION, "3") => Some((DirectionCategory::Prohibited, Direction::ToFrom)),
            _ => None,
        }
    }

    pub fn preferred_field(value: &str) -> Option<&'static str> {
        Some(match value {
            "1" => "STAAPreferred",
            "2" => "TruckDesignatedPreferred",
            "3" => "NRHMPreferred",
            "4" => "ExplosivesPreferred",
            "5" => "PIHPreferred",
            "6" => "MedicalWastePreferred",
            "7" => "RadioactivePreferred",
            "8" => "HazmatPreferred",
            "9" => "LocallyPreferred",
            _ => return None,
        })
    }

    pub fn prohibited_field(value: &str) -> Option<&'static str> {
        Some(match value {
            "1" => "ExplosivesProhibited",
            "2" => "GasProhibited",
            "3" => "FlammableProhibited",
            "4" => "CombustibleProhibited",
            "5" => "OrganicProhibited",
            "6" => "PoisonProhibited",
            "7" => "RadioactiveProhibited",
            "8" => "CorrosiveProhibited",
            "9" => "OtherHazmatProhibited",
            "20" => "AnyHazmatProhibited",
            "21" => "PIHProhibited",
            "22" => "HarmfulToWaterProhibited",
            "23" => "ExplosiveAndFlammableProhibited",
            _ => return None,
        })
    }

    /// Every hazmat field a street may receive, in output order.
    pub const PREFERRED_FIELDS: [&str; 9] = [
        "STAAPreferred",
        "TruckDesignatedPreferred",
        "NRHMPreferred",
        "ExplosivesPreferred",
        "PIHPreferred",
        "MedicalWastePreferred",
        "RadioactivePreferred",
        "HazmatPreferred",
        "LocallyPreferred",
    ];

    pub const PROHIBITED_FIELDS: [&str; 13] = [
        "ExplosivesProhibited",
        "GasProhibited",
        "FlammableProhibited",
        "CombustibleProhibited",
        "OrganicProhibited",
        "PoisonProhibited",
        "RadioactiveProhibited",
        "CorrosiveProhibited",
        "OtherHazmatProhibited",
        "AnyHazmatProhibited",
        "PIHProhibited",
        "HarmfulToWaterProhibited",
        "ExplosiveAndFlammableProhibited",
    ];

    pub const LIMIT_FIELDS: [&str; 6] = [
        "HeightLimit_Meters",
        "WeightLimit_Kilograms",
        "WeightLimitPerAxle_Kilograms",
        "LengthLimit_Meters",
        "WidthLimit_Meters",
        "KingpinToRearAxleLengthLimit_Meters",
    ];

    pub const VEHICLE_FIELDS: [&str; 5] = [
        "MaxTrailersAllowedOnTruck",
        "SemiOrTractorWOneOrMoreTrailersProhibited",
        "MaxAxlesAllowed",
        "SingleAxleProhibited",
        "TandemAxleProhibited",
    ];

    pub const TRUCK_SPEED_FIELD: &str = "TruckKPH";
    pub const TRUCK_FC_OVERRIDE_FIELD: &str = "TruckFCOverride";

    fn limit_field(mod_type: i64) -> Option<&'static str> {
        Some(match mod_type {
            HEIGHT => "HeightLimit_Meters",
            WEIGHT => "WeightLimit_Kilograms",
            WEIGHT_PER_AXLE => "WeightLimitPerAxle_Kilograms",
            LENGTH => "LengthLimit_Meters",
            WIDTH => "WidthLimit_Meters",
            KINGPIN => "KingpinToRearAxleLengthLimit_Meters",
            _ => return None,
        })
    }

    /// Convert a raw modifier value to metric units.
    pub fn convert(mod_type: i64, raw: f64, units: UnitSystem) -> f64 {
        match (units, mod_type) {
            (UnitSystem::Us, HEIGHT | LENGTH | WIDTH | KINGPIN) => raw * 0.0254,
            (UnitSystem::Us, WEIGHT | WEIGHT_PER_AXLE) => raw * 0.453_592_37,
            (UnitSystem::Us, TRUCK_SPEED) => raw * 1.609_344,
            (UnitSystem::Metric, HEIGHT | LENGTH | WIDTH | KINGPIN) => raw * 0.01,
            _ => raw,
        }
    }

    /// Effects shared by streets and turns: hazmat prohibitions, limits,
    /// trailer and axle rules.
    fn vehicle_effect(mod_type: i64, value: &str, units: UnitSystem) -> Option<ModifierEffect> {
        let prohibited = DirectionCategory::Prohibited;
        match mod_type {
            HAZMAT_PROHIBITED => {
                prohibited_field(value).map(|f| ModifierEffect::directed(f, AttrValue::yes(), prohibited))
            }
            TRAILERS => match value {
                "1" | "2" | "3" => {
                    let n = value.parse::<i64>().ok()?;
                    Some(ModifierEffect::directed("MaxTrailersAllowedOnTruck", AttrValue::Int(n), prohibited))
                }
                "4" => Some(ModifierEffect::directed(
                    "SemiOrTractorWOneOrMoreTrailersProhibited",
                    AttrValue::yes(),
                    prohibited,
                )),
                _ => None,
            },
            AXLES => match value {
                "1" | "2" | "3" | "4" | "5" => {
                    let n = value.parse::<i64>().ok()?;
                    Some(ModifierEffect::directed("MaxAxlesAllowed", AttrValue::Int(n), prohibited))
                }
                "6" => Some(ModifierEffect::directed("SingleAxleProhibited", AttrValue::yes(), prohibited)),
                "7" => Some(ModifierEffect::directed("TandemAxleProhibited", AttrValue::yes(), prohibited)),
                _ => None,
            },
            _ => {
                let field = limit_field(mod_type)?;
                let raw = value.trim().parse::<f64>().ok()?;
                Some(ModifierEffect::directed(
                    field,
                    AttrValue::Number(convert(mod_type, raw, units)),
                    prohibited,
                ))
            }
        }
    }

    /// Interpret one non-indicator modifier row for a street.
    pub fn street_effect(mod_type: i64, value: &str, units: UnitSystem) -> Option<ModifierEffect> {
        match mod_type {
            HAZMAT_PERMITTED => match value {
                "15" => Some(ModifierEffect { field: TRUCK_FC_OVERRIDE_FIELD, value: AttrValue::Int(1), category: None }),
                "16" => Some(ModifierEffect { field: TRUCK_FC_OVERRIDE_FIELD, value: AttrValue::Int(2), category: None }),
                _ => preferred_field(value)
                    .map(|f| ModifierEffect::directed(f, AttrValue::yes(), DirectionCategory::Preferred)),
            },
            TRUCK_SPEED => {
                let raw = value.trim().parse::<f64>().ok()?;
                Some(ModifierEffect::directed(
                    TRUCK_SPEED_FIELD,
                    AttrValue::Number(convert(mod_type, raw, units)),
                    DirectionCategory::Preferred,
                ))
            }
            _ => vehicle_effect(mod_type, value, units),
        }
    }

    /// Interpret one modifier row for a restricted turn.  Turns carry no
    /// direction, so only the field and value are returned.
    pub fn turn_effect(mod_type: i64, value: &str, units: UnitSystem) -> Option<(&'static str, AttrValue)> {
        vehicle_effect(mod_type, value, units).map(|e| (e.field, e.value))
    }

    /// Fields set by the second street pass.
    pub const PREFERRED_TRUCK_ROUTE_FIELD: &str = "PreferredTruckRoute";
    pub const PREFERRED_TRUCK_ROUTE_SOURCES: [&str; 3] =
        ["STAAPreferred", "TruckDesignatedPreferred", "LocallyPreferred"];

    pub const ALL_TRANSPORT_PROHIBITED_FIELD: &str = "AllTransportProhibited";
}

// ── TomTom MultiNet ───────────────────────────────────────────────────────────

pub mod multinet {
    use super::*;

    /// Vehicle types kept from `rs`.
    pub const VEHICLE_TYPES: [i64; 5] = [0, 11, 12, 16, 17];

    pub fn vehicle_field(vt: i64) -> Option<&'static str> {
        Some(match vt {
            0 => "AllVehicles_Restricted",
            11 => "PassengerCars_Restricted",
            12 => "ResidentialVehicles_Restricted",
            16 => "Taxis_Restricted",
            17 => "PublicBuses_Restricted",
            _ => return None,
        })
    }

    pub const VEHICLE_FIELDS: [&str; 5] = [
        "AllVehicles_Restricted",
        "PassengerCars_Restricted",
        "ResidentialVehicles_Restricted",
        "Taxis_Restricted",
        "PublicBuses_Restricted",
    ];

    pub const DIRECTIONAL_FLOW: &str = "DF";
    pub const ALL_VEHICLES_TURN: &str = "8I";
    pub const TURN_FEATURE_TYPES: [i64; 2] = [2101, 2103];
    pub const FORK_FEATURE_TYPE: i64 = 9401;

    /// `DIR_POS` of a directional-flow restriction.
    pub fn dir_pos(code: i64) -> Option<Direction> {
        match code {
            1 => Some(Direction::Both),
            2 => Some(Direction::FromTo),
            3 => Some(Direction::ToFrom),
            _ => None,
        }
    }

    /// Logistics truck routes (`ltr.PREFERRED`).
    pub fn ltr_preferred(code: i64) -> Option<&'static str> {
        Some(match code {
            1 => "NationalSTAARoute",
            2 => "NationalRouteAccess",
            3 => "DesignatedTruckRoute",
            4 => "TruckBypassRoad",
            _ => return None,
        })
    }

    /// Logistics truck routes (`ltr.RESTRICTED`).
    pub fn ltr_restricted(code: i64) -> Option<&'static str> {
        Some(match code {
            1 => "NoCommercialVehicles",
            2 => "ImmediateAccessOnly",
            3 => "TrucksRestricted",
            _ => return None,
        })
    }

    pub const LTR_FIELDS: [&str; 7] = [
        "NationalSTAARoute",
        "NationalRouteAccess",
        "DesignatedTruckRoute",
        "TruckBypassRoad",
        "NoCommercialVehicles",
        "ImmediateAccessOnly",
        "TrucksRestricted",
    ];

    fn is_weight(code: &str) -> bool {
        matches!(code, "!A" | "!B" | "!C" | "!D" | "!E" | "!F")
    }

    fn is_dimension(code: &str) -> bool {
        matches!(code, "!G" | "!H" | "!I" | "!J" | "!K" | "!L" | "!M" | "!N" | "!O" | "!P")
    }

    /// Value of a logistics restriction (`lrs`) row.
    ///
    /// Weights end up in short tons, dimensions in feet.  Unknown codes or
    /// units yield `None`.
    pub fn lrs_value(restrtyp: &str, unit_meas: i64, limit: f64) -> Option<AttrValue> {
        if restrtyp.starts_with('@') {
            return Some(AttrValue::yes());
        }
        if is_weight(restrtyp) {
            return match unit_meas {
                7 => Some(AttrValue::Number(limit)),
                3 => Some(AttrValue::Number(limit / 0.907_184_74)),
                _ => None,
            };
        }
        if is_dimension(restrtyp) {
            return match unit_meas {
                9 => Some(AttrValue::Number(limit)),
                8 => Some(AttrValue::Number(limit / 12.0)),
                5 => Some(AttrValue::Number(limit / 0.3048)),
                4 => Some(AttrValue::Number(limit / 30.48)),
                _ => None,
            };
        }
        None
    }

    /// Field name of a logistics restriction, e.g. `Lim_A_VT11_RV1`.
    pub fn lrs_field(restrtyp: &str, vt: i64, restrval: i64) -> String {
        let code: String = restrtyp
            .chars()
            .map(|c| match c {
                '!' => "Lim_".to_string(),
                '@' => "Load_".to_string(),
                c if c.is_ascii_alphanumeric() => c.to_string(),
                _ => "_".to_string(),
            })
            .collect();
        format!("{code}_VT{vt}_RV{restrval}")
    }
}
