//! `sdp-vendor` — reading HERE NAVSTREETS and TomTom MultiNet exports.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`source`]   | `RowSource` trait, `CsvSource`, chunked reads                 |
//! | [`adapter`]  | `VendorAdapter` trait and the vendor-neutral tables it returns |
//! | [`here`]     | `HereAdapter`                                                 |
//! | [`multinet`] | `MultiNetAdapter`                                             |
//! | [`lang`]     | vendor language code → two-letter code                        |
//! | [`error`]    | `VendorError`, `VendorResult<T>`                              |
//!
//! An adapter owns its [`RowSource`] and is driven by the pipeline one table
//! at a time:
//!
//! ```text
//! edge_table ─► restriction_table ─► maneuver_table ─► fork_table
//!            ─► signpost_table ─► traffic_table ─► tmc_table ─► release
//! ```

pub mod adapter;
pub mod error;
pub mod here;
pub mod lang;
pub mod multinet;
pub mod source;


pub use adapter::{HistoricalTraffic, ManeuverTable, RestrictionTable, TrafficTable, VendorAdapter};
pub use error::{VendorError, VendorResult};
pub use here::HereAdapter;
pub use multinet::MultiNetAdapter;
pub use source::{Chunks, CsvSource, DEFAULT_CHUNK_SIZE, RowSource};
