//! Data shared between stages, with explicit release points.
//!
//! Each slot is filled by one stage and dropped at a [`Checkpoint`] once no
//! later stage reads it, keeping peak memory to what the current stage
//! needs.
//!
//! | Checkpoint        | Dropped                               | After            |
//! |-------------------|---------------------------------------|------------------|
//! | `RestrictionRows` | raw restriction and modifier rows     | street pass      |
//! | `TrafficFrames`   | profile and street traffic rows       | traffic tables   |
//! | `TurnRestrictions`| restriction fields by condition       | turns            |
//! | `ManeuverPaths`   | vendor maneuver / path rows           | forks            |
//! | `Geometry`        | geometry cache                        | signposts        |
//! | `Edges`           | edge table and its street id index    | live traffic     |

use sdp_network::{EdgeTable, GeometryCache};
use sdp_restrict::TurnRestrictions;
use sdp_vendor::{RestrictionTable, TrafficTable};

use crate::{PipelineError, PipelineResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    RestrictionRows,
    TrafficFrames,
    TurnRestrictions,
    ManeuverPaths,
    Geometry,
    Edges,
}

impl Checkpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Checkpoint::RestrictionRows => "restriction rows",
            Checkpoint::TrafficFrames => "traffic frames",
            Checkpoint::TurnRestrictions => "turn restrictions",
            Checkpoint::ManeuverPaths => "maneuver paths",
            Checkpoint::Geometry => "geometry cache",
            Checkpoint::Edges => "edge table",
        }
    }
}

#[derive(Debug, Default)]
pub struct PipelineContext {
    pub edges: Option<EdgeTable>,
    pub restrictions: Option<RestrictionTable>,
    pub turn_restrictions: Option<TurnRestrictions>,
    pub traffic: Option<TrafficTable>,
    pub geometry: Option<GeometryCache>,
    released: Vec<Checkpoint>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the data behind `checkpoint`.  Vendor-held rows
    /// (`ManeuverPaths`) are released by the caller through the adapter.
    pub fn release(&mut self, checkpoint: Checkpoint) {
        match checkpoint {
            Checkpoint::RestrictionRows => self.restrictions = None,
            Checkpoint::TrafficFrames => self.traffic = None,
            Checkpoint::TurnRestrictions => self.turn_restrictions = None,
            Checkpoint::ManeuverPaths => {}
            Checkpoint::Geometry => {
                if let Some(cache) = self.geometry.take() {
                    log::debug!("geometry cache: {} streets, {} fetches", cache.len(), cache.fetches());
                }
            }
            Checkpoint::Edges => self.edges = None,
        }
        log::debug!("released {}", checkpoint.as_str());
        self.released.push(checkpoint);
    }

    /// Checkpoints passed so far, in order.
    pub fn released(&self) -> &[Checkpoint] {
        &self.released
    }
}

/// Borrow a slot that must still be filled.
pub(crate) fn held<'a, T>(slot: &'a Option<T>, what: &'static str) -> PipelineResult<&'a T> {
    slot.as_ref().ok_or(PipelineError::Released(what))
}

pub(crate) fn held_mut<'a, T>(slot: &'a mut Option<T>, what: &'static str) -> PipelineResult<&'a mut T> {
    slot.as_mut().ok_or(PipelineError::Released(what))
}
