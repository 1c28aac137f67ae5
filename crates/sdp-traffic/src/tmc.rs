//! Streets_TMC: which traffic location codes cover which edge direction.

use sdp_core::{Diagnostics, StreetId};
use sdp_network::EdgeTable;
use sdp_output::StreetTmcRow;

use crate::assign::TmcTrafficRef;

/// Length of a location code without its direction sign.
const TMC_LEN: usize = 9;

fn tmc_row(street_id: i64, tmc: String, against: bool, fcid: i64, fid: i64) -> StreetTmcRow {
    StreetTmcRow {
        street_id,
        tmc,
        fcid,
        fid,
        frm_pos: if against { 1.0 } else { 0.0 },
        to_pos: if against { 0.0 } else { 1.0 },
    }
}

/// HERE: the Traffic table with the direction sign moved into the edge
/// positions.
pub fn here_tmc_rows(
    traffic: &[TmcTrafficRef],
    edges: &EdgeTable,
    fcid: i64,
    diag: &mut dyn Diagnostics,
) -> Vec<StreetTmcRow> {
    traffic
        .iter()
        .filter_map(|t| {
            let Some(edge) = edges.find(StreetId(t.link_id)) else {
                diag.warning(format!(
                    "The Streets table is missing an entry with ID {}, which is used in the Traffic table.",
                    t.link_id
                ));
                return None;
            };
            let against = t.traffic_cd.starts_with('-');
            let tmc = t.traffic_cd.trim_start_matches(['+', '-']).to_string();
            Some(tmc_row(t.link_id, tmc, against, fcid, edge.oid()))
        })
        .collect()
}

/// One MultiNet `rd` row.
#[derive(Clone, Debug, PartialEq)]
pub struct RdsTmcRecord {
    pub id: i64,
    /// Direction sign followed by the location reference; the code itself
    /// is the trailing nine characters.
    pub rdstmc: String,
}

/// MultiNet: direction from the leading sign, code from the last nine
/// characters.
pub fn multinet_tmc_rows(
    records: &[RdsTmcRecord],
    edges: &EdgeTable,
    fcid: i64,
    diag: &mut dyn Diagnostics,
) -> Vec<StreetTmcRow> {
    let mut rows = Vec::with_capacity(records.len());
    for r in records {
        let Some(edge) = edges.find(StreetId(r.id)) else {
            diag.warning(format!(
                "The Streets table is missing an entry with ID {}, which is used in the RDS-TMC Information (RD) \
                 historical traffic table.",
                r.id
            ));
            continue;
        };
        let against = match r.rdstmc.chars().next() {
            Some('+') => false,
            Some('-') => true,
            _ => {
                diag.warning(format!(
                    "The RDS-TMC Information (RD) historical traffic table has an invalid RDSTMC field value for ID {}.",
                    r.id
                ));
                continue;
            }
        };
        let chars: Vec<char> = r.rdstmc.chars().collect();
        let tmc: String = chars[chars.len().saturating_sub(TMC_LEN)..].iter().collect();
        rows.push(tmc_row(r.id, tmc, against, fcid, edge.oid()));
    }
    log::debug!("streets tmc: {} of {} rd records", rows.len(), records.len());
    rows
}
