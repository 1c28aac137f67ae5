//! A single directed street segment and its attribute values.

use std::collections::BTreeMap;
use std::fmt;

use sdp_core::{NodeId, Polyline, StreetId};

// ── AttrValue ─────────────────────────────────────────────────────────────────

/// Value of one named edge attribute (`FT_HeightLimit_Meters`, `ST_NAME`, ...).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Number(f64),
}

impl AttrValue {
    /// The `"Y"` marker used for every boolean restriction field.
    pub fn yes() -> AttrValue {
        AttrValue::Text("Y".to_string())
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, AttrValue::Text(s) if s == "Y")
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(i) => Some(*i as f64),
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Int(i) => write!(f, "{i}"),
            AttrValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

// ── Edge ──────────────────────────────────────────────────────────────────────

/// A street as delivered by the vendor, enriched in place by later passes.
///
/// `from_node` / `to_node` follow the digitized direction of `geometry`.
/// Attributes are only written through [`EdgeTable`](crate::EdgeTable) so the
/// table can keep its field registry complete.
#[derive(Clone, Debug)]
pub struct Edge {
    pub street_id: StreetId,
    pub from_node: NodeId,
    pub to_node: NodeId,
    pub meters: f64,
    /// Speed-class derived free-flow speed, the fallback for travel times.
    pub kph: f64,
    pub geometry: Polyline,
    pub(crate) attrs: BTreeMap<String, AttrValue>,
}

impl Edge {
    pub fn new(
        street_id: StreetId,
        from_node: NodeId,
        to_node: NodeId,
        meters: f64,
        kph: f64,
        geometry: Polyline,
    ) -> Self {
        Self { street_id, from_node, to_node, meters, kph, geometry, attrs: BTreeMap::new() }
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn is_yes(&self, name: &str) -> bool {
        self.attrs.get(name).is_some_and(AttrValue::is_yes)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `true` when `node` is either endpoint.
    #[inline]
    pub fn touches(&self, node: NodeId) -> bool {
        self.from_node == node || self.to_node == node
    }
}
