//! The vendor strategy seam.
//!
//! Each vendor reads its own tables and hands back vendor-neutral values:
//! an [`EdgeTable`], a [`RestrictionTable`], maneuver / fork / signpost
//! records and traffic inputs.  Everything downstream is shared.

use rustc_hash::FxHashSet;

use sdp_core::{ConditionId, Diagnostics};
use sdp_maneuver::{ForkRecord, ManeuverRecord, SignpostRecord};
use sdp_network::EdgeTable;
use sdp_output::{DailyProfileRow, ProfileRow, StreetPatternRow, StreetTmcRow};
use sdp_restrict::{DerivedRestriction, RestrictionSet};
use sdp_traffic::DailySpeedRecord;

use crate::VendorResult;

/// Which historical traffic tables to read.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HistoricalTraffic {
    #[default]
    None,
    /// HERE link reference files.
    LinkReference,
    /// HERE TMC reference file joined through the Traffic table.
    Tmc,
    /// MultiNet speed profile tables.
    Enabled,
}

/// Restriction rows plus the passes the resolver runs over them.
#[derive(Debug, Default)]
pub struct RestrictionTable {
    pub set: RestrictionSet,
    /// Turn conditions that prohibit all transport unless a modifier narrows
    /// them (HERE `COND_TYPE 26`).
    pub transport_conditions: FxHashSet<ConditionId>,
    /// Flags computed from resolved street flags, in order.
    pub derived: Vec<DerivedRestriction>,
}

/// Restricted turns and the widest one.
#[derive(Debug, Default)]
pub struct ManeuverTable {
    pub records: Vec<ManeuverRecord>,
    /// Number of `Edge#` column groups the turn table needs.
    pub max_edges: usize,
    /// Column holding the vendor maneuver id (`COND_ID` / `ID`).
    pub id_column: &'static str,
    /// Whether turn rows carry `COND_TYPE`.
    pub with_cond_type: bool,
}

/// Historical traffic, already joined to the edge table.
#[derive(Debug)]
pub enum TrafficTable {
    /// HERE: one speed pattern per weekday and edge direction.
    Patterns {
        profiles: Vec<ProfileRow>,
        streets: Vec<StreetPatternRow>,
        with_tmc: bool,
    },
    /// MultiNet: one profile id per weekday plus summary speeds.
    Daily {
        profiles: Vec<ProfileRow>,
        streets: Vec<DailyProfileRow>,
        speeds: Vec<DailySpeedRecord>,
    },
}

/// One vendor's view of its input tables.
///
/// Methods are called in pipeline order; later ones receive the edge table
/// built by [`edge_table`](Self::edge_table) to resolve street ids.
pub trait VendorAdapter {
    fn name(&self) -> &'static str;

    /// Column names for the vendor id and the two endpoint node ids.
    fn street_columns(&self) -> (&'static str, &'static str, &'static str);

    /// Edges with their vendor attributes, deduplicated and spatially
    /// ordered.
    fn edge_table(&mut self, diag: &mut dyn Diagnostics) -> VendorResult<EdgeTable>;

    fn restriction_table(&mut self, diag: &mut dyn Diagnostics) -> VendorResult<RestrictionTable>;

    fn maneuver_table(&mut self, diag: &mut dyn Diagnostics) -> VendorResult<ManeuverTable>;

    fn fork_table(&mut self, diag: &mut dyn Diagnostics) -> VendorResult<Vec<ForkRecord>>;

    fn signpost_table(&mut self, diag: &mut dyn Diagnostics) -> VendorResult<Vec<SignpostRecord>>;

    /// `None` when `mode` is [`HistoricalTraffic::None`].
    fn traffic_table(
        &mut self,
        edges: &EdgeTable,
        mode: HistoricalTraffic,
        fcid: i64,
        diag: &mut dyn Diagnostics,
    ) -> VendorResult<Option<TrafficTable>>;

    /// Streets_TMC rows; empty when the vendor has no location-code table.
    fn tmc_table(&mut self, edges: &EdgeTable, fcid: i64, diag: &mut dyn Diagnostics) -> VendorResult<Vec<StreetTmcRow>>;

    /// Release raw tables kept between calls (restriction rows reused by the
    /// turn pass, maneuver paths shared by turns and forks).
    fn release(&mut self) {}
}
