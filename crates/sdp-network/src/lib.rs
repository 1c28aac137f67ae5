//! `sdp-network` — the prepared edge table.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`edge`]     | `Edge`, `AttrValue`                                       |
//! | [`network`]  | `EdgeTable` (id index, attribute registry), `EdgeTableBuilder` (dedup + spatial order) |
//! | [`geometry`] | `GeometrySource` trait, `EdgeShape`, lazy `GeometryCache` |
//! | [`error`]    | `NetworkError`, `NetworkResult<T>`                        |
//!
//! Adjacency is never indexed: maneuver builders infer it from the shared
//! from/to node ids of consecutive edges.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `AttrValue`.            |

pub mod edge;
pub mod error;
pub mod geometry;
pub mod network;

#[cfg(test)]
mod tests;

pub use edge::{AttrValue, Edge};
pub use error::{NetworkError, NetworkResult};
pub use geometry::{EdgeShape, GeometryCache, GeometrySource};
pub use network::{EdgeTable, EdgeTableBuilder};
