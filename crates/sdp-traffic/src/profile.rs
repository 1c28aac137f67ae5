//! Speed profiles: normalization to the midnight slot and aggregate speeds.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use sdp_core::{Diagnostics, SliceGranularity};
use sdp_output::ProfileRow;

use crate::{TrafficError, TrafficResult};

/// Slot every factor is expressed relative to (midnight).
const REFERENCE_SLOT: usize = 0;

/// `Σ(1/v) / Σ(1/v²)`.  `None` for an empty input or any speed that is not
/// a positive finite number.  Identical speeds return that speed exactly.
pub fn harmonic_speed<I: IntoIterator<Item = f64>>(speeds: I) -> Option<f64> {
    let (mut inv, mut inv_sq) = (0.0, 0.0);
    let mut first: Option<f64> = None;
    let mut uniform = true;
    for v in speeds {
        if !(v.is_finite() && v > 0.0) {
            return None;
        }
        match first {
            None => first = Some(v),
            Some(f) => uniform &= f == v,
        }
        inv += 1.0 / v;
        inv_sq += 1.0 / (v * v);
    }
    let first = first?;
    Some(if uniform { first } else { inv / inv_sq })
}

/// `values` divided by `values[reference]`; the reference slot itself becomes
/// exactly `1.0`.  `None` when the reference is missing or not positive.
pub fn relative_to(values: &[f64], reference: usize) -> Option<Vec<f64>> {
    let base = *values.get(reference)?;
    if !(base.is_finite() && base > 0.0) {
        return None;
    }
    Some(
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| if i == reference { 1.0 } else { v / base })
            .collect(),
    )
}

// ── HERE patterns ─────────────────────────────────────────────────────────────

/// One row of the HERE SPD file: absolute km/h per 15-minute slice.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedPattern {
    pub pattern_id: i64,
    pub speeds: Vec<f64>,
}

/// What the per-day join needs to know about a pattern.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PatternSummary {
    /// Object id of the pattern's row in the Patterns table.
    pub object_id: i64,
    pub base_speed: f64,
    pub average_speed: f64,
    /// Every slice has the same speed.
    pub is_const: bool,
}

/// Pattern id → summary.
#[derive(Debug, Default)]
pub struct PatternCatalog {
    by_pattern: FxHashMap<i64, PatternSummary>,
}

impl PatternCatalog {
    pub fn get(&self, pattern_id: i64) -> Option<&PatternSummary> {
        self.by_pattern.get(&pattern_id)
    }

    pub fn is_const(&self, pattern_id: i64) -> bool {
        self.get(pattern_id).is_some_and(|p| p.is_const)
    }

    pub fn len(&self) -> usize {
        self.by_pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pattern.is_empty()
    }
}

/// Normalize every pattern and number the emitted rows from 1 in input
/// order.
///
/// A pattern whose slice count does not match the day is a schema error.
/// A pattern whose midnight speed is not positive is skipped with a warning.
pub fn build_patterns(
    patterns: &[SpeedPattern],
    diag: &mut dyn Diagnostics,
) -> TrafficResult<(Vec<ProfileRow>, PatternCatalog)> {
    let expected = SliceGranularity::Minutes15.slice_count();
    let mut rows = Vec::with_capacity(patterns.len());
    let mut catalog = PatternCatalog::default();

    for p in patterns {
        if p.speeds.len() != expected {
            return Err(TrafficError::SliceCount { pattern: p.pattern_id, expected, got: p.speeds.len() });
        }
        let (Some(factors), Some(average_speed)) =
            (relative_to(&p.speeds, REFERENCE_SLOT), harmonic_speed(p.speeds.iter().copied()))
        else {
            diag.warning(format!(
                "Speed pattern {} has a zero or missing speed and was skipped.",
                p.pattern_id
            ));
            continue;
        };

        let object_id = rows.len() as i64 + 1;
        let base_speed = p.speeds[REFERENCE_SLOT];
        let is_const = p.speeds.iter().all(|&v| v == base_speed);
        catalog
            .by_pattern
            .insert(p.pattern_id, PatternSummary { object_id, base_speed, average_speed, is_const });
        rows.push(ProfileRow {
            object_id,
            profile_id: p.pattern_id,
            base_speed: Some(base_speed),
            average_speed: Some(average_speed),
            factors,
        });
    }

    log::debug!("speed patterns: {} normalized of {}", rows.len(), patterns.len());
    Ok((rows, catalog))
}

// ── MultiNet daily profiles ───────────────────────────────────────────────────

/// One `hspr` row: relative speed (percent) of one 5-minute slot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlotSample {
    pub profile_id: i64,
    /// Seconds after midnight.
    pub time_slot: u32,
    pub rel_sp: f64,
}

/// One DailyProfiles row per profile id, ascending.  Missing slots are
/// filled with `1.0` and reported once per profile.
pub fn daily_profiles(samples: &[SlotSample], diag: &mut dyn Diagnostics) -> Vec<ProfileRow> {
    let granularity = SliceGranularity::Minutes5;
    let slots = granularity.slice_count();
    let mut grouped: BTreeMap<i64, Vec<Option<f64>>> = BTreeMap::new();

    for s in samples {
        let factors = grouped.entry(s.profile_id).or_insert_with(|| vec![None; slots]);
        match granularity.slice_of_seconds(s.time_slot) {
            Some(i) => factors[i] = Some(s.rel_sp / 100.0),
            None => diag.warning(format!(
                "TIME_SLOT {} of PROFILE_ID {} is past the end of the day and was ignored.",
                s.time_slot, s.profile_id
            )),
        }
    }

    grouped
        .into_iter()
        .enumerate()
        .map(|(i, (profile_id, factors))| {
            if factors.iter().any(Option::is_none) {
                diag.warning(format!(
                    "The Historical Speed Profiles table has incomplete TIME_SLOT records for PROFILE_ID \
                     {profile_id}. The missing values have been filled in with a value of 1."
                ));
            }
            ProfileRow {
                object_id: i as i64 + 1,
                profile_id,
                base_speed: None,
                average_speed: None,
                factors: factors.into_iter().map(|f| f.unwrap_or(1.0)).collect(),
            }
        })
        .collect()
}
