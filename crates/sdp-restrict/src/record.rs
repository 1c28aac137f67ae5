//! Canonical restriction records.

use sdp_core::{ConditionId, Direction, StreetId};
use sdp_network::AttrValue;

/// Which indicator table a modifier's direction is read from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DirectionCategory {
    Preferred,
    Prohibited,
}

impl DirectionCategory {
    pub fn other(self) -> DirectionCategory {
        match self {
            DirectionCategory::Preferred => DirectionCategory::Prohibited,
            DirectionCategory::Prohibited => DirectionCategory::Preferred,
        }
    }
}

/// What a record writes to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum RestrictionTarget {
    Street(StreetId),
    Turn(ConditionId),
}

/// How the traversal direction of a street record is decided.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DirectionSource {
    /// Direction carried on the row itself (MultiNet `DIR_POS`).
    Explicit(Direction),
    /// Direction stored in a separate indicator row of the same condition.
    Lookup(ConditionId, DirectionCategory),
    /// Field written without an `FT_`/`TF_` prefix.
    Undirected,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RestrictionRecord {
    pub target: RestrictionTarget,
    /// Field name without direction prefix, e.g. `HeightLimit_Meters`.
    pub field: String,
    pub value: AttrValue,
    pub direction: DirectionSource,
}

impl RestrictionRecord {
    pub fn street(street: StreetId, field: &str, value: AttrValue, direction: DirectionSource) -> Self {
        Self { target: RestrictionTarget::Street(street), field: field.to_string(), value, direction }
    }

    pub fn turn(condition: ConditionId, field: &str, value: AttrValue) -> Self {
        Self {
            target: RestrictionTarget::Turn(condition),
            field: field.to_string(),
            value,
            direction: DirectionSource::Undirected,
        }
    }
}

/// One direction-indicator row (HERE modifier types 60 and 38).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DirectionIndicator {
    pub condition: ConditionId,
    pub category: DirectionCategory,
    pub direction: Direction,
}

/// Everything a vendor adapter hands to the resolver.
#[derive(Debug, Default)]
pub struct RestrictionSet {
    pub records: Vec<RestrictionRecord>,
    pub indicators: Vec<DirectionIndicator>,
    /// Directional street fields to create even when no edge sets them.
    pub street_fields: Vec<String>,
    /// Undirected street fields to create even when no edge sets them.
    pub plain_street_fields: Vec<String>,
    /// Turn fields in output column order.
    pub turn_fields: Vec<String>,
}

impl RestrictionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RestrictionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn declare_street_field(&mut self, field: &str) {
        if !self.street_fields.iter().any(|f| f == field) {
            self.street_fields.push(field.to_string());
        }
    }

    pub fn declare_plain_street_field(&mut self, field: &str) {
        if !self.plain_street_fields.iter().any(|f| f == field) {
            self.plain_street_fields.push(field.to_string());
        }
    }

    pub fn declare_turn_field(&mut self, field: &str) {
        if !self.turn_fields.iter().any(|f| f == field) {
            self.turn_fields.push(field.to_string());
        }
    }
}
