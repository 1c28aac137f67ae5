//! `sdp-maneuver` — turn, road-fork and signpost builders.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`record`]   | vendor-neutral inputs: `ManeuverRecord`, `ForkRecord`, `SignpostRecord` |
//! | [`chain`]    | orienting, trimming and joining edge geometries           |
//! | [`turn`]     | `TurnBuilder` → `TurnRow`                                 |
//! | [`fork`]     | `ForkResolver` → `ForkRow`                                |
//! | [`signpost`] | `SignpostBuilder` → `SignpostRow` + `SignpostStreetRow`s  |
//! | [`error`]    | `ManeuverError`, `ManeuverResult<T>`                      |
//!
//! # Orientation
//!
//! Turns and signposts orient edges geometrically: each edge is walked
//! forward when its first vertex meets the end of the chain built so far and
//! backward when its last vertex does.  Road forks never look at geometry;
//! they match the node ids stored on each edge.
//!
//! Every builder is fed one record at a time and either returns a row or
//! reports a warning and returns `None`.  Object ids are only consumed by
//! emitted rows, so the output numbering is dense.

pub mod chain;
pub mod error;
pub mod fork;
pub mod record;
pub mod signpost;
pub mod turn;

#[cfg(test)]
mod tests;

pub use chain::{Chain, SIGNPOST_TRIM, TURN_TRIM, join_oriented, stitch};
pub use error::{ManeuverError, ManeuverResult};
pub use fork::{FORK_MAX_EDGES, ForkResolver};
pub use record::{ForkOrientation, ForkRecord, ManeuverRecord, PathStep, SignPath, SignpostRecord, StartHint};
pub use signpost::{SignpostBuilder, SignpostTables};
pub use turn::{TURN_EDGE_POS, TurnBuilder, turn_layout};
