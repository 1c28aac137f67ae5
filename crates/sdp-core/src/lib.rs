//! `sdp-core` — foundational types for the street data preparation engine.
//!
//! Every other `sdp-*` crate depends on this one.  It has no `sdp-*`
//! dependencies; externally it uses `log`, `thiserror`, and `wkt` /
//! `geo-types` for geometry text (plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `EdgeId`, `StreetId`, `NodeId`, `ConditionId`, `ProfileId`|
//! | [`geo`]         | `Point`, `Polyline`, fractional trimming, geodesic length |
//! | [`direction`]   | `Direction`, `Edge1End`, `Traversal`                      |
//! | [`time`]        | `Weekday`, `SliceGranularity`                             |
//! | [`transport`]   | `AccessClass` (vehicle access categories)                 |
//! | [`diag`]        | `Diagnostics` warning channel                             |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and value enums.     |

pub mod diag;
pub mod direction;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;
pub mod transport;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use diag::{CollectedDiagnostics, Diagnostics, LogDiagnostics};
pub use direction::{Direction, Edge1End, Traversal};
pub use error::{CoreError, CoreResult};
pub use geo::{Point, Polyline};
pub use ids::{ConditionId, EdgeId, NodeId, ProfileId, StreetId};
pub use time::{SliceGranularity, Weekday};
pub use transport::AccessClass;
