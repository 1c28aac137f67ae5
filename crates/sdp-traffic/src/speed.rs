//! Directional speeds and travel times written onto the edge table.

use sdp_core::{Direction, EdgeId, StreetId};
use sdp_network::{AttrValue, EdgeTable};
use sdp_output::StreetPatternRow;

use crate::merge::DailySpeedRecord;

/// A speed attribute and the travel-time attribute derived from it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpeedField {
    pub speed: &'static str,
    pub minutes: &'static str,
}

pub const HERE_SPEED_FIELDS: &[SpeedField] = &[SpeedField { speed: "AverageSpeed", minutes: "Minutes" }];

pub const MULTINET_SPEED_FIELDS: &[SpeedField] = &[
    SpeedField { speed: "Weekday", minutes: "WeekdayMinutes" },
    SpeedField { speed: "Weekend", minutes: "WeekendMinutes" },
    SpeedField { speed: "AllWeek", minutes: "AllWeekMinutes" },
];

/// Minutes needed to drive `meters` at `kph`.
#[inline]
pub fn travel_minutes(meters: f64, kph: f64) -> f64 {
    meters * 0.06 / kph
}

fn direction_of(frm_pos: f64) -> Direction {
    if frm_pos == 0.0 { Direction::FromTo } else { Direction::ToFrom }
}

/// `FT_AverageSpeed` / `TF_AverageSpeed` from Streets_Patterns rows.
pub fn apply_pattern_speeds(edges: &mut EdgeTable, rows: &[StreetPatternRow]) {
    declare_directional(edges, HERE_SPEED_FIELDS);
    for r in rows {
        edges.set_directional(
            StreetId(r.link_id),
            direction_of(r.frm_pos),
            "AverageSpeed",
            AttrValue::from(r.average_speed),
        );
    }
}

/// `FT_`/`TF_` Weekday, Weekend and AllWeek speeds from `hsnp` records.
pub fn apply_daily_speeds(edges: &mut EdgeTable, records: &[DailySpeedRecord]) {
    declare_directional(edges, MULTINET_SPEED_FIELDS);
    for r in records {
        let dir = match r.val_dir {
            2 => Direction::FromTo,
            3 => Direction::ToFrom,
            _ => continue,
        };
        let street = StreetId(r.network_id);
        edges.set_directional(street, dir, "Weekday", AttrValue::from(r.sp_weekday));
        edges.set_directional(street, dir, "Weekend", AttrValue::from(r.sp_weekend));
        edges.set_directional(street, dir, "AllWeek", AttrValue::from(r.sp_week));
    }
}

fn declare_directional(edges: &mut EdgeTable, fields: &[SpeedField]) {
    for prefix in Direction::Both.prefixes() {
        for f in fields {
            edges.declare_field(&format!("{prefix}{}", f.speed));
            edges.declare_field(&format!("{prefix}{}", f.minutes));
        }
    }
}

/// Directional travel times for every edge.  Where a directional speed is
/// missing the edge's free-flow `kph` is used.
pub fn apply_minutes(edges: &mut EdgeTable, fields: &[SpeedField]) {
    declare_directional(edges, fields);
    let mut updates: Vec<(EdgeId, String, f64)> = Vec::new();
    for (id, edge) in edges.iter() {
        for prefix in Direction::Both.prefixes() {
            for f in fields {
                let speed = edge
                    .attr(&format!("{prefix}{}", f.speed))
                    .and_then(AttrValue::as_f64)
                    .filter(|&v| v > 0.0)
                    .unwrap_or(edge.kph);
                if speed > 0.0 {
                    updates.push((id, format!("{prefix}{}", f.minutes), travel_minutes(edge.meters, speed)));
                }
            }
        }
    }
    for (id, name, minutes) in updates {
        edges.set_attr(id, &name, AttrValue::from(minutes));
    }
}

/// A single undirected `Minutes` field from `kph`, used when no traffic
/// data is loaded.
pub fn apply_plain_minutes(edges: &mut EdgeTable) {
    edges.declare_field("Minutes");
    let updates: Vec<(EdgeId, f64)> = edges
        .iter()
        .filter(|(_, e)| e.kph > 0.0)
        .map(|(id, e)| (id, travel_minutes(e.meters, e.kph)))
        .collect();
    for (id, minutes) in updates {
        edges.set_attr(id, "Minutes", AttrValue::from(minutes));
    }
}
