//! Restriction resolution passes.
//!
//! # Street pass
//!
//! [`resolve_streets`] writes every street record onto its edge.  The
//! direction of a record comes from one of three places (see
//! [`DirectionSource`]); for HERE most records point at an indicator row of
//! the same condition, resolved through [`DirectionLookup`].  A record whose
//! condition has no indicator at all is dropped without a warning.
//!
//! # Derived pass
//!
//! [`apply_derived`] ORs already-resolved flags into a new flag, separately
//! for each traversal direction.
//!
//! # Turn pass
//!
//! [`resolve_turns`] groups turn records by condition id into
//! [`TurnRestrictions`].  Turn fields are never directional.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

use sdp_core::{ConditionId, Diagnostics, Direction, EdgeId};
use sdp_network::{AttrValue, EdgeTable};

use crate::record::{
    DirectionCategory, DirectionIndicator, DirectionSource, RestrictionSet, RestrictionTarget,
};
use crate::vocab::here;

// ── DirectionLookup ───────────────────────────────────────────────────────────

/// Condition id → direction, one map per indicator category.
#[derive(Debug, Default)]
pub struct DirectionLookup {
    preferred: FxHashMap<ConditionId, Direction>,
    prohibited: FxHashMap<ConditionId, Direction>,
}

impl DirectionLookup {
    /// Build from indicator rows.  The first row per condition and category
    /// wins.
    pub fn from_indicators(indicators: &[DirectionIndicator]) -> Self {
        let mut lookup = Self::default();
        for ind in indicators {
            lookup
                .table_mut(ind.category)
                .entry(ind.condition)
                .or_insert(ind.direction);
        }
        lookup
    }

    fn table(&self, category: DirectionCategory) -> &FxHashMap<ConditionId, Direction> {
        match category {
            DirectionCategory::Preferred => &self.preferred,
            DirectionCategory::Prohibited => &self.prohibited,
        }
    }

    fn table_mut(&mut self, category: DirectionCategory) -> &mut FxHashMap<ConditionId, Direction> {
        match category {
            DirectionCategory::Preferred => &mut self.preferred,
            DirectionCategory::Prohibited => &mut self.prohibited,
        }
    }

    /// Direction for `condition`, read from `category` first and from the
    /// other category when the condition has no indicator of its own kind.
    pub fn lookup(&self, condition: ConditionId, category: DirectionCategory) -> Option<Direction> {
        self.table(category)
            .get(&condition)
            .or_else(|| self.table(category.other()).get(&condition))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.preferred.len() + self.prohibited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preferred.is_empty() && self.prohibited.is_empty()
    }
}

// ── Street pass ───────────────────────────────────────────────────────────────

/// Counts from one street pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StreetResolution {
    pub applied: usize,
    /// Records whose condition had no direction indicator.
    pub undirected_dropped: usize,
    /// Records naming a street not in the edge table.
    pub orphaned: usize,
}

/// Apply every street record of `set` to `edges`.
///
/// Declared fields are registered up front (as `FT_`/`TF_` pairs for
/// directional ones) so the output carries them even when unused.  Records
/// are applied in input order; a later record for the same field overwrites
/// an earlier one.
pub fn resolve_streets(
    edges: &mut EdgeTable,
    set: &RestrictionSet,
    diag: &mut dyn Diagnostics,
) -> StreetResolution {
    for field in &set.street_fields {
        for prefix in Direction::Both.prefixes() {
            edges.declare_field(&format!("{prefix}{field}"));
        }
    }
    for field in &set.plain_street_fields {
        edges.declare_field(field);
    }

    let lookup = DirectionLookup::from_indicators(&set.indicators);
    let mut stats = StreetResolution::default();

    for record in &set.records {
        let RestrictionTarget::Street(street) = record.target else {
            continue;
        };
        let found = match record.direction {
            DirectionSource::Undirected => {
                edges.set_street_attr(street, &record.field, record.value.clone())
            }
            DirectionSource::Explicit(dir) => {
                edges.set_directional(street, dir, &record.field, record.value.clone())
            }
            DirectionSource::Lookup(condition, category) => {
                let Some(dir) = lookup.lookup(condition, category) else {
                    stats.undirected_dropped += 1;
                    continue;
                };
                edges.set_directional(street, dir, &record.field, record.value.clone())
            }
        };
        if found {
            stats.applied += 1;
        } else {
            stats.orphaned += 1;
            diag.warning(format!(
                "Restriction {} for street {street} skipped: street not in edge table",
                record.field
            ));
        }
    }

    log::debug!(
        "street restrictions: {} applied, {} without direction, {} orphaned",
        stats.applied,
        stats.undirected_dropped,
        stats.orphaned
    );
    stats
}

// ── Derived pass ──────────────────────────────────────────────────────────────

/// A flag set on a direction when any of its source flags is set there.
#[derive(Copy, Clone, Debug)]
pub struct DerivedRestriction {
    pub field: &'static str,
    pub any_of: &'static [&'static str],
}

pub const PREFERRED_TRUCK_ROUTE: DerivedRestriction = DerivedRestriction {
    field: here::PREFERRED_TRUCK_ROUTE_FIELD,
    any_of: &here::PREFERRED_TRUCK_ROUTE_SOURCES,
};

/// Run `rule` over every edge.  Returns the number of directions set.
pub fn apply_derived(edges: &mut EdgeTable, rule: &DerivedRestriction) -> usize {
    let mut hits: Vec<(EdgeId, String)> = Vec::new();
    for (id, edge) in edges.iter() {
        for prefix in Direction::Both.prefixes() {
            if rule.any_of.iter().any(|src| edge.is_yes(&format!("{prefix}{src}"))) {
                hits.push((id, format!("{prefix}{}", rule.field)));
            }
        }
    }

    for prefix in Direction::Both.prefixes() {
        edges.declare_field(&format!("{prefix}{}", rule.field));
    }
    let count = hits.len();
    for (id, name) in hits {
        edges.set_attr(id, &name, AttrValue::yes());
    }
    count
}

// ── Turn pass ─────────────────────────────────────────────────────────────────

/// Restriction fields per turn condition.
#[derive(Debug, Default)]
pub struct TurnRestrictions {
    by_condition: FxHashMap<ConditionId, BTreeMap<String, AttrValue>>,
    fields: Vec<String>,
}

impl TurnRestrictions {
    pub fn get(&self, condition: ConditionId) -> Option<&BTreeMap<String, AttrValue>> {
        self.by_condition.get(&condition)
    }

    pub fn value(&self, condition: ConditionId, field: &str) -> Option<&AttrValue> {
        self.get(condition).and_then(|m| m.get(field))
    }

    /// Every `(field, value)` pair across all conditions.
    pub fn values(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.by_condition
            .values()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Output column order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.by_condition.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_condition.is_empty()
    }

    fn declare(&mut self, field: &str) {
        if !self.fields.iter().any(|f| f == field) {
            self.fields.push(field.to_string());
        }
    }
}

/// Group turn records by condition.
///
/// A condition in `transport_conditions` that ends up with no field besides
/// its `AR_*` access flags is a blanket truck prohibition and receives
/// `AllTransportProhibited = "Y"`.
pub fn resolve_turns(
    set: &RestrictionSet,
    transport_conditions: &FxHashSet<ConditionId>,
) -> TurnRestrictions {
    let mut out = TurnRestrictions::default();
    for field in &set.turn_fields {
        out.declare(field);
    }

    for record in &set.records {
        let RestrictionTarget::Turn(condition) = record.target else {
            continue;
        };
        out.declare(&record.field);
        out.by_condition
            .entry(condition)
            .or_default()
            .insert(record.field.clone(), record.value.clone());
    }

    let mut blanket = 0usize;
    for &condition in transport_conditions {
        let fields = out.by_condition.entry(condition).or_default();
        if fields.keys().all(|k| k.starts_with("AR_")) {
            fields.insert(here::ALL_TRANSPORT_PROHIBITED_FIELD.to_string(), AttrValue::yes());
            blanket += 1;
        }
    }
    if blanket > 0 {
        out.declare(here::ALL_TRANSPORT_PROHIBITED_FIELD);
    }

    log::debug!("turn restrictions: {} conditions, {} blanket truck prohibitions", out.len(), blanket);
    out
}
