//! Restricted-turn rows.

use sdp_core::{ConditionId, Diagnostics, Edge1End, NodeId, StreetId};
use sdp_network::{EdgeShape, GeometryCache, GeometrySource};
use sdp_output::{TurnEdge, TurnLayout, TurnRow, infer_columns};
use sdp_restrict::TurnRestrictions;

use crate::chain::{TURN_TRIM, stitch};
use crate::record::{ManeuverRecord, StartHint};
use crate::{ManeuverError, ManeuverResult};

/// Position written to every `Edge#Pos` column.
pub const TURN_EDGE_POS: f64 = 0.5;

/// Column layout for turn rows carrying `restrictions`.
pub fn turn_layout(
    id_column: &'static str,
    with_cond_type: bool,
    max_edges: usize,
    restrictions: &TurnRestrictions,
) -> TurnLayout {
    TurnLayout {
        id_column,
        with_cond_type,
        max_edges,
        restriction_columns: infer_columns(restrictions.fields(), restrictions.values()),
    }
}

/// Orientation flag for a maneuver that names its junction node.
fn edge1_end_at(first: &EdgeShape, junction: NodeId) -> Edge1End {
    if junction == first.from_node {
        Edge1End::No
    } else if junction == first.to_node {
        Edge1End::Yes
    } else {
        Edge1End::Unknown
    }
}

/// Builds [`TurnRow`]s one maneuver at a time.
#[derive(Debug)]
pub struct TurnBuilder {
    max_edges: usize,
    fcid: i64,
    next_object_id: i64,
}

impl TurnBuilder {
    /// `max_edges` is the widest turn the output table can hold.
    pub fn new(max_edges: usize, fcid: i64) -> ManeuverResult<Self> {
        if max_edges < 2 {
            return Err(ManeuverError::InvalidConfig(format!(
                "a turn needs at least two edges, max_edges is {max_edges}"
            )));
        }
        Ok(Self { max_edges, fcid, next_object_id: 1 })
    }

    pub fn max_edges(&self) -> usize {
        self.max_edges
    }

    /// Rows emitted so far.
    pub fn emitted(&self) -> usize {
        (self.next_object_id - 1) as usize
    }

    pub fn build<S: GeometrySource + ?Sized>(
        &mut self,
        record: &ManeuverRecord,
        source: &S,
        cache: &mut GeometryCache,
        restrictions: &TurnRestrictions,
        diag: &mut dyn Diagnostics,
    ) -> Option<TurnRow> {
        let mut streets: &[StreetId] = &record.streets;
        match streets.len() {
            0 => {
                diag.warning(format!(
                    "There were no maneuver path records for turn ID {}.",
                    record.id
                ));
                return None;
            }
            1 => {
                diag.warning(format!(
                    "The maneuver path for turn ID {} has only one associated edge.",
                    record.id
                ));
                return None;
            }
            n if n > self.max_edges => {
                diag.warning(format!(
                    "Turn ID {} has {n} edges, more than the {} the turn table supports. The turn will be truncated.",
                    record.id, self.max_edges
                ));
                streets = &streets[..self.max_edges];
            }
            _ => {}
        }

        for &street in streets {
            if cache.get(source, street).is_none() {
                diag.warning(format!(
                    "The Streets table is missing an entry with ID {street}, which is used in turn ID {}.",
                    record.id
                ));
                return None;
            }
        }
        let shapes: Vec<&EdgeShape> = streets.iter().filter_map(|&s| cache.cached(s)).collect();

        let edge1_end = match record.start {
            StartHint::Flag(flag) => flag,
            StartHint::Junction(node) => edge1_end_at(shapes[0], node),
        };
        let lines: Vec<_> = shapes.iter().map(|s| &s.geometry).collect();
        let chain = stitch(&lines, edge1_end, TURN_TRIM)?;

        let object_id = self.next_object_id;
        self.next_object_id += 1;
        if chain.mismatch {
            diag.warning(format!(
                "Turn geometry may be incorrect for turn ObjectID {object_id} because the geometry of adjacent \
                 street segments used to build the turn geometry did not have coincident endpoints."
            ));
        }

        Some(TurnRow {
            object_id,
            maneuver_id: record.id,
            cond_type: record.cond_type,
            edge1_end,
            edges: shapes
                .iter()
                .map(|s| TurnEdge { fcid: self.fcid, fid: s.edge.oid(), pos: TURN_EDGE_POS })
                .collect(),
            restrictions: restrictions.get(ConditionId(record.id)).cloned().unwrap_or_default(),
            shape: chain.shape,
        })
    }

    /// Build every record, skipping the ones that fail.
    pub fn build_all<S: GeometrySource + ?Sized>(
        &mut self,
        records: &[ManeuverRecord],
        source: &S,
        cache: &mut GeometryCache,
        restrictions: &TurnRestrictions,
        diag: &mut dyn Diagnostics,
    ) -> Vec<TurnRow> {
        let rows: Vec<TurnRow> = records
            .iter()
            .filter_map(|r| self.build(r, source, cache, restrictions, diag))
            .collect();
        log::debug!("turns: {} of {} maneuvers emitted", rows.len(), records.len());
        rows
    }
}
