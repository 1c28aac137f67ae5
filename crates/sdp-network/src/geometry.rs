//! Per-edge geometry lookup with a lazily populated cache.
//!
//! Maneuver and signpost builders revisit the same few thousand junction
//! edges many times.  [`GeometryCache`] memoizes each lookup (misses
//! included) on first access; later calls for the same street return the
//! stored entry without touching the source again.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use sdp_core::{EdgeId, NodeId, Polyline, StreetId};

use crate::network::EdgeTable;

/// Everything a maneuver builder needs about one edge.
#[derive(Clone, Debug)]
pub struct EdgeShape {
    pub edge: EdgeId,
    pub from_node: NodeId,
    pub to_node: NodeId,
    pub geometry: Polyline,
}

/// Anything that can produce the shape of a street by vendor id.
pub trait GeometrySource {
    fn fetch_shape(&self, street: StreetId) -> Option<EdgeShape>;
}

impl GeometrySource for EdgeTable {
    fn fetch_shape(&self, street: StreetId) -> Option<EdgeShape> {
        let id = self.find(street)?;
        let e = self.edge(id);
        Some(EdgeShape {
            edge: id,
            from_node: e.from_node,
            to_node: e.to_node,
            geometry: e.geometry.clone(),
        })
    }
}

#[derive(Debug, Default)]
pub struct GeometryCache {
    entries: FxHashMap<StreetId, Option<EdgeShape>>,
    fetches: usize,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shape of `street`, fetched from `source` on first request only.
    pub fn get<S: GeometrySource + ?Sized>(
        &mut self,
        source: &S,
        street: StreetId,
    ) -> Option<&EdgeShape> {
        match self.entries.entry(street) {
            Entry::Occupied(o) => o.into_mut().as_ref(),
            Entry::Vacant(v) => {
                self.fetches += 1;
                v.insert(source.fetch_shape(street)).as_ref()
            }
        }
    }

    /// Shape of `street` if an earlier [`get`](Self::get) found it.
    pub fn cached(&self, street: StreetId) -> Option<&EdgeShape> {
        self.entries.get(&street).and_then(Option::as_ref)
    }

    /// Number of times the source was consulted.
    pub fn fetches(&self) -> usize {
        self.fetches
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
