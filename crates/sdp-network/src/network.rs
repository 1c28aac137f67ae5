//! The edge table and its builder.
//!
//! # Layout
//!
//! Edges live in one `Vec<Edge>` indexed by `EdgeId`; the vendor id → edge
//! lookup is an `FxHashMap`.  `EdgeId`s are assigned after duplicates are
//! removed and after edges are reordered along an R-tree bulk-load
//! traversal, so neighbouring edges get neighbouring object ids in the
//! output.
//!
//! # Field registry
//!
//! Every attribute name ever written is recorded once, in first-write order,
//! so the Streets output has a stable column set even for attributes only a
//! few edges carry.

use rstar::{AABB, RTree, RTreeObject};
use rustc_hash::{FxHashMap, FxHashSet};

use sdp_core::{Direction, EdgeId, StreetId};

use crate::edge::{AttrValue, Edge};
use crate::error::{NetworkError, NetworkResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Edge midpoint plus its slot in the deduplicated input.
struct EdgeEntry {
    point: [f64; 2],
    slot: usize,
}

impl RTreeObject for EdgeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

// ── EdgeTable ─────────────────────────────────────────────────────────────────

/// Prepared edges.  Construct with [`EdgeTableBuilder`].
#[derive(Debug, Default)]
pub struct EdgeTable {
    edges: Vec<Edge>,
    index: FxHashMap<StreetId, EdgeId>,
    fields: Vec<String>,
    known_fields: FxHashSet<String>,
    duplicates_removed: usize,
}

impl EdgeTable {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of duplicate vendor ids dropped at build time.
    pub fn duplicates_removed(&self) -> usize {
        self.duplicates_removed
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn find(&self, street: StreetId) -> Option<EdgeId> {
        self.index.get(&street).copied()
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn by_street(&self, street: StreetId) -> Option<&Edge> {
        self.find(street).map(|id| self.edge(id))
    }

    /// Like [`by_street`](Self::by_street) but an error when absent.
    pub fn require(&self, street: StreetId) -> NetworkResult<&Edge> {
        self.by_street(street).ok_or(NetworkError::StreetNotFound(street))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i as u32), e))
    }

    // ── Attributes ────────────────────────────────────────────────────────

    /// Field names in first-declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Register a field without writing any value.
    pub fn declare_field(&mut self, name: &str) {
        if self.known_fields.insert(name.to_string()) {
            self.fields.push(name.to_string());
        }
    }

    pub fn set_attr(&mut self, id: EdgeId, name: &str, value: AttrValue) {
        self.declare_field(name);
        self.edges[id.index()].attrs.insert(name.to_string(), value);
    }

    /// Set an attribute by vendor id.  Returns `false` when the street is
    /// not in the table.
    pub fn set_street_attr(&mut self, street: StreetId, name: &str, value: AttrValue) -> bool {
        match self.find(street) {
            Some(id) => {
                self.set_attr(id, name, value);
                true
            }
            None => false,
        }
    }

    /// Write `FT_<field>` and/or `TF_<field>` according to `dir`.
    pub fn set_directional(
        &mut self,
        street: StreetId,
        dir: Direction,
        field: &str,
        value: AttrValue,
    ) -> bool {
        let Some(id) = self.find(street) else {
            return false;
        };
        for prefix in dir.prefixes() {
            self.set_attr(id, &format!("{prefix}{field}"), value.clone());
        }
        true
    }
}

// ── EdgeTableBuilder ──────────────────────────────────────────────────────────

/// Collect vendor edges, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use sdp_core::{NodeId, Point, Polyline, StreetId};
/// use sdp_network::{Edge, EdgeTableBuilder};
///
/// let line = Polyline::from_points(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]).unwrap();
/// let mut b = EdgeTableBuilder::new();
/// b.add_edge(Edge::new(StreetId(7), NodeId(1), NodeId(2), 10.0, 48.0, line.clone()));
/// b.add_edge(Edge::new(StreetId(7), NodeId(1), NodeId(2), 10.0, 48.0, line));
/// let table = b.build().unwrap();
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.duplicates_removed(), 1);
/// ```
pub struct EdgeTableBuilder {
    raw: Vec<Edge>,
    declared: Vec<String>,
    spatial_order: bool,
}

impl EdgeTableBuilder {
    pub fn new() -> Self {
        Self { raw: Vec::new(), declared: Vec::new(), spatial_order: true }
    }

    pub fn with_capacity(edges: usize) -> Self {
        Self { raw: Vec::with_capacity(edges), ..Self::new() }
    }

    /// Keep input order instead of R-tree order (default: spatial order on).
    pub fn spatial_order(mut self, on: bool) -> Self {
        self.spatial_order = on;
        self
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.raw.push(edge);
    }

    /// Attach a vendor attribute to the most recently added edge.
    pub fn set_last_attr(&mut self, name: &str, value: AttrValue) {
        if let Some(edge) = self.raw.last_mut() {
            edge.attrs.insert(name.to_string(), value);
        }
    }

    /// Pre-register an output field so it appears ahead of later fields.
    pub fn declare_field(&mut self, name: &str) {
        self.declared.push(name.to_string());
    }

    pub fn edge_count(&self) -> usize {
        self.raw.len()
    }

    /// Deduplicate (first occurrence wins), reorder, and index.
    pub fn build(self) -> NetworkResult<EdgeTable> {
        let total = self.raw.len();
        let mut seen = FxHashSet::default();
        let unique: Vec<Edge> = self
            .raw
            .into_iter()
            .filter(|e| seen.insert(e.street_id))
            .collect();
        let duplicates_removed = total - unique.len();
        if duplicates_removed > 0 {
            log::info!("Removed {duplicates_removed} duplicate streets");
        }
        if u32::try_from(unique.len()).is_err() {
            return Err(NetworkError::TooManyEdges(unique.len()));
        }

        let edges = if self.spatial_order { spatially_ordered(unique) } else { unique };

        let index = edges
            .iter()
            .enumerate()
            .map(|(i, e)| (e.street_id, EdgeId(i as u32)))
            .collect();

        let mut table = EdgeTable {
            edges,
            index,
            fields: Vec::new(),
            known_fields: FxHashSet::default(),
            duplicates_removed,
        };
        for name in &self.declared {
            table.declare_field(name);
        }
        let attr_names: Vec<String> = table
            .edges
            .iter()
            .flat_map(|e| e.attrs.keys().cloned())
            .collect();
        for name in &attr_names {
            table.declare_field(name);
        }
        log::debug!("edge table built: {} edges, {} fields", table.len(), table.fields.len());
        Ok(table)
    }
}

impl Default for EdgeTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reorder edges along the leaf order of an R-tree bulk-loaded with their
/// endpoint midpoints.
fn spatially_ordered(edges: Vec<Edge>) -> Vec<Edge> {
    let entries: Vec<EdgeEntry> = edges
        .iter()
        .enumerate()
        .map(|(slot, e)| {
            let (a, b) = (e.geometry.first(), e.geometry.last());
            EdgeEntry { point: [(a.x + b.x) * 0.5, (a.y + b.y) * 0.5], slot }
        })
        .collect();
    let tree = RTree::bulk_load(entries);
    let order: Vec<usize> = tree.iter().map(|entry| entry.slot).collect();

    let mut slots: Vec<Option<Edge>> = edges.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|slot| slots[slot].take())
        .collect()
}
