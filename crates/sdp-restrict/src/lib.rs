//! `sdp-restrict` — resolving vendor restriction rows into directional edge
//! and turn attributes.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`vocab`]    | vendor code → field-name tables, unit conversions             |
//! | [`record`]   | canonical `RestrictionRecord`, `DirectionIndicator`, `RestrictionSet` |
//! | [`resolver`] | `DirectionLookup`, street pass, derived pass, turn pass       |
//!
//! Vendor adapters translate raw rows into a [`RestrictionSet`] using
//! [`vocab`]; everything after that is vendor-neutral.
//!
//! Resolution never fails.  Rows that cannot be applied (no direction
//! indicator, unknown street) are counted and skipped.

pub mod record;
pub mod resolver;
pub mod vocab;


pub use record::{
    DirectionCategory, DirectionIndicator, DirectionSource, RestrictionRecord, RestrictionSet,
    RestrictionTarget,
};
pub use resolver::{
    DerivedRestriction, DirectionLookup, PREFERRED_TRUCK_ROUTE, StreetResolution, TurnRestrictions,
    apply_derived, resolve_streets, resolve_turns,
};
