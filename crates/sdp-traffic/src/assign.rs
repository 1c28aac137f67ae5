//! Which pattern applies to which edge direction (HERE).
//!
//! Two reference flavours exist: link references keyed by the vendor link
//! id, and TMC references keyed by a traffic location code that the Traffic
//! table maps back to links.  Both end as [`PatternAssignment`]s.

use rustc_hash::FxHashMap;

use sdp_core::StreetId;
use sdp_network::EdgeTable;

use crate::profile::PatternCatalog;

/// One row of a link reference file.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkPatternRef {
    pub link_id: i64,
    /// `"F"` (from the reference node) or `"T"` (toward it).
    pub travel_direction: String,
    /// Pattern id per weekday, Sunday first.
    pub days: [i64; 7],
}

/// One row of the Traffic table.
#[derive(Clone, Debug, PartialEq)]
pub struct TmcTrafficRef {
    pub link_id: i64,
    /// Signed location code, e.g. `-116P04355`.
    pub traffic_cd: String,
}

/// One row of the TMC reference file.
#[derive(Clone, Debug, PartialEq)]
pub struct TmcPatternRef {
    pub tmc: String,
    pub days: [i64; 7],
}

/// Pattern ids for one edge direction, before the per-day join.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternAssignment {
    pub link_id: i64,
    pub tmc: Option<String>,
    pub days: [i64; 7],
    pub frm_pos: f64,
    pub to_pos: f64,
}

/// Assign a chunk of link reference rows.
///
/// Rows for links outside `edges` are dropped.  With `minor_fc` (the FC5
/// file), rows whose Sunday pattern is constant and whose seven day ids are
/// all equal are dropped as well: they carry no information beyond the
/// free-flow speed.
pub fn link_assignments(
    chunk: &[LinkPatternRef],
    edges: &EdgeTable,
    catalog: &PatternCatalog,
    minor_fc: bool,
) -> Vec<PatternAssignment> {
    chunk
        .iter()
        .filter(|r| edges.find(StreetId(r.link_id)).is_some())
        .filter(|r| !(minor_fc && catalog.is_const(r.days[0]) && r.days.iter().all(|&d| d == r.days[0])))
        .map(|r| PatternAssignment {
            link_id: r.link_id,
            tmc: None,
            days: r.days,
            frm_pos: if r.travel_direction == "T" { 1.0 } else { 0.0 },
            to_pos: if r.travel_direction == "F" { 1.0 } else { 0.0 },
        })
        .collect()
}

/// Strip the leading sign of a traffic code and spell the remaining signs
/// as letters, the way the TMC reference file keys its rows.
pub(crate) fn normalize_tmc(code: &str) -> String {
    code.trim_start_matches('+')
        .trim_start_matches('-')
        .replace('+', "P")
        .replace('-', "N")
}

/// Join Traffic rows to the TMC reference.  Codes without a reference row
/// produce no assignment.
pub fn tmc_assignments(traffic: &[TmcTrafficRef], patterns: &[TmcPatternRef]) -> Vec<PatternAssignment> {
    let by_tmc: FxHashMap<&str, &[i64; 7]> = patterns.iter().map(|p| (p.tmc.as_str(), &p.days)).collect();
    traffic
        .iter()
        .filter_map(|t| {
            let tmc = normalize_tmc(&t.traffic_cd);
            let days = **by_tmc.get(tmc.as_str())?;
            let against = t.traffic_cd.starts_with('-');
            Some(PatternAssignment {
                link_id: t.link_id,
                tmc: Some(tmc),
                days,
                frm_pos: if against { 1.0 } else { 0.0 },
                to_pos: if against { 0.0 } else { 1.0 },
            })
        })
        .collect()
}
