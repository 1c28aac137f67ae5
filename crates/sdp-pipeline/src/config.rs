//! Run configuration.

use sdp_vendor::HistoricalTraffic;

use crate::{PipelineError, PipelineResult};

/// Input data vendor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Vendor {
    /// HERE NAVSTREETS.
    #[default]
    Here,
    /// TomTom MultiNet.
    MultiNet,
}

/// Content of the `TimeZones` table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TimeZone {
    /// No `TimeZones` table.
    #[default]
    None,
    /// One row naming a Windows time zone, e.g. `"Pacific Standard Time"`.
    Single(String),
}

/// Options for one preparation run.
///
/// | Field                | Default     |
/// |----------------------|-------------|
/// | `vendor`             | `Here`      |
/// | `historical_traffic` | `None`      |
/// | `live_traffic`       | `false`     |
/// | `transport_fields`   | `false`     |
/// | `logistics`          | `false`     |
/// | `time_zone`          | `None`      |
/// | `chunk_size`         | `100_000`   |
/// | `edge_fc_id`         | `1`         |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    pub vendor: Vendor,
    pub historical_traffic: HistoricalTraffic,
    /// Build the `Streets_TMC` cross-reference.
    pub live_traffic: bool,
    /// HERE: resolve truck and hazmat condition modifiers.
    pub transport_fields: bool,
    /// MultiNet: read the logistics restriction tables.
    pub logistics: bool,
    pub time_zone: TimeZone,
    /// Rows per chunk when reading large traffic tables.
    pub chunk_size: usize,
    /// Value of every `*FCID` column.
    pub edge_fc_id: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vendor: Vendor::Here,
            historical_traffic: HistoricalTraffic::None,
            live_traffic: false,
            transport_fields: false,
            logistics: false,
            time_zone: TimeZone::None,
            chunk_size: sdp_vendor::DEFAULT_CHUNK_SIZE,
            edge_fc_id: 1,
        }
    }
}

impl PipelineConfig {
    pub fn here() -> Self {
        Self::default()
    }

    pub fn multinet() -> Self {
        Self { vendor: Vendor::MultiNet, ..Self::default() }
    }

    /// Reject option combinations no vendor can run.
    ///
    /// Options that only one vendor reads (`transport_fields`, `logistics`)
    /// are ignored with a log warning when set for the other one.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.chunk_size == 0 {
            return Err(PipelineError::Config("chunk_size must be at least 1".to_string()));
        }
        if matches!(&self.time_zone, TimeZone::Single(name) if name.trim().is_empty()) {
            return Err(PipelineError::Config("time zone name is empty".to_string()));
        }
        let traffic_ok = match self.vendor {
            Vendor::Here => self.historical_traffic != HistoricalTraffic::Enabled,
            Vendor::MultiNet => matches!(self.historical_traffic, HistoricalTraffic::None | HistoricalTraffic::Enabled),
        };
        if !traffic_ok {
            return Err(PipelineError::Config(format!(
                "historical traffic mode {:?} is not available for {:?} data",
                self.historical_traffic, self.vendor
            )));
        }
        match self.vendor {
            Vendor::Here if self.logistics => log::warn!("logistics restrictions are MultiNet only; ignored"),
            Vendor::MultiNet if self.transport_fields => {
                log::warn!("transport fields are HERE only; ignored")
            }
            _ => {}
        }
        Ok(())
    }
}
