//! Per-day joins producing the edge-to-profile tables.

use sdp_core::{Diagnostics, StreetId};
use sdp_network::EdgeTable;
use sdp_output::{DailyProfileRow, StreetPatternRow};

use crate::assign::PatternAssignment;
use crate::profile::{PatternCatalog, harmonic_speed};

/// Replace each day's pattern id by the pattern's object id and aggregate
/// the seven daily speeds.
pub fn merge_patterns(
    assignments: &[PatternAssignment],
    catalog: &PatternCatalog,
    edges: &EdgeTable,
    fcid: i64,
    diag: &mut dyn Diagnostics,
) -> Vec<StreetPatternRow> {
    let mut rows = Vec::with_capacity(assignments.len());
    'rows: for a in assignments {
        let Some(edge) = edges.find(StreetId(a.link_id)) else {
            diag.warning(format!(
                "The Streets table is missing an entry with ID {}, which is used in the traffic pattern tables.",
                a.link_id
            ));
            continue;
        };

        let mut days = [0i64; 7];
        let mut averages = [0.0f64; 7];
        let mut bases = [0.0f64; 7];
        for (i, &pattern) in a.days.iter().enumerate() {
            let Some(p) = catalog.get(pattern) else {
                diag.warning(format!(
                    "Speed pattern {pattern} referenced by link {} is not in the speed profile table.",
                    a.link_id
                ));
                continue 'rows;
            };
            days[i] = p.object_id;
            averages[i] = p.average_speed;
            bases[i] = p.base_speed;
        }
        let (Some(average_speed), Some(base_speed)) = (harmonic_speed(averages), harmonic_speed(bases)) else {
            diag.warning(format!("Link {} has a zero speed in its weekly pattern and was skipped.", a.link_id));
            continue;
        };

        rows.push(StreetPatternRow {
            link_id: a.link_id,
            tmc: a.tmc.clone(),
            days,
            fcid,
            fid: edge.oid(),
            frm_pos: a.frm_pos,
            to_pos: a.to_pos,
            average_speed,
            base_speed,
        });
    }
    log::debug!("streets patterns: {} of {} assignments", rows.len(), assignments.len());
    rows
}

/// One `hsnp` row.
#[derive(Clone, Debug, PartialEq)]
pub struct DailySpeedRecord {
    pub network_id: i64,
    /// `2` positive direction, `3` negative.
    pub val_dir: i64,
    pub sp_free_flow: f64,
    pub sp_weekday: f64,
    pub sp_weekend: f64,
    pub sp_week: f64,
    pub profiles: [i64; 7],
}

impl DailySpeedRecord {
    /// `(EdgeFrmPos, EdgeToPos)` for the two directions the table uses.
    pub fn positions(&self) -> Option<(f64, f64)> {
        match self.val_dir {
            2 => Some((0.0, 1.0)),
            3 => Some((1.0, 0.0)),
            _ => None,
        }
    }
}

/// Streets_DailyProfiles rows for every directional record with a positive
/// free-flow speed.
pub fn daily_profile_rows(
    records: &[DailySpeedRecord],
    edges: &EdgeTable,
    fcid: i64,
    diag: &mut dyn Diagnostics,
) -> Vec<DailyProfileRow> {
    let mut rows = Vec::new();
    for r in records {
        if r.sp_free_flow <= 0.0 {
            continue;
        }
        let Some((frm_pos, to_pos)) = r.positions() else {
            continue;
        };
        let Some(edge) = edges.find(StreetId(r.network_id)) else {
            diag.warning(format!(
                "The Streets table is missing an entry with ID {}, which is used in the network profile link \
                 historical traffic table.",
                r.network_id
            ));
            continue;
        };
        rows.push(DailyProfileRow {
            network_id: r.network_id,
            val_dir: r.val_dir,
            sp_free_flow: r.sp_free_flow,
            sp_weekday: r.sp_weekday,
            sp_weekend: r.sp_weekend,
            sp_week: r.sp_week,
            profiles: r.profiles,
            fcid,
            fid: edge.oid(),
            frm_pos,
            to_pos,
        });
    }
    log::debug!("streets daily profiles: {} of {} records", rows.len(), records.len());
    rows
}
