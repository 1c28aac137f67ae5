//! `sdp-traffic` — historical traffic profiles and edge travel times.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`profile`] | harmonic speed, slot normalization, `PatternCatalog`, MultiNet daily profiles |
//! | [`assign`]  | HERE link-reference and TMC pattern assignments                |
//! | [`merge`]   | per-day join into `StreetPatternRow`s, MultiNet `DailyProfileRow`s |
//! | [`speed`]   | directional speed fields and `Minutes` on the edge table       |
//! | [`tmc`]     | Streets_TMC cross-reference rows                               |
//! | [`error`]   | `TrafficError`, `TrafficResult<T>`                             |
//!
//! # Average speed
//!
//! Every aggregate speed uses the same weighting:
//!
//! ```text
//! v_avg = Σ(1/vᵢ) / Σ(1/vᵢ²)
//! ```
//!
//! over the slices of one profile, or over the seven daily averages of one
//! edge direction.  For a constant speed `v` it returns `v`.
//!
//! # Data flow (HERE)
//!
//! ```text
//! SPD rows ──normalize──► PatternCatalog + Patterns rows
//! link refs / TMC refs ──assign──► PatternAssignment
//! PatternAssignment + PatternCatalog ──merge──► Streets_Patterns rows
//! Streets_Patterns rows ──speed──► FT_/TF_AverageSpeed, FT_/TF_Minutes
//! ```

pub mod assign;
pub mod error;
pub mod merge;
pub mod profile;
pub mod speed;
pub mod tmc;

#[cfg(test)]
mod tests;

pub use assign::{LinkPatternRef, PatternAssignment, TmcPatternRef, TmcTrafficRef, link_assignments, tmc_assignments};
pub use error::{TrafficError, TrafficResult};
pub use merge::{DailySpeedRecord, daily_profile_rows, merge_patterns};
pub use profile::{
    PatternCatalog, PatternSummary, SlotSample, SpeedPattern, build_patterns, daily_profiles, harmonic_speed,
    relative_to,
};
pub use speed::{
    HERE_SPEED_FIELDS, MULTINET_SPEED_FIELDS, SpeedField, apply_daily_speeds, apply_minutes, apply_pattern_speeds,
    apply_plain_minutes, travel_minutes,
};
pub use tmc::{RdsTmcRecord, here_tmc_rows, multinet_tmc_rows};
