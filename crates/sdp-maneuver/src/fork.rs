//! Road-fork rows.
//!
//! A fork is an entry edge followed by two or three branch edges.  Edge
//! positions are whole-edge markers (`0`/`1`), derived from node ids only.

use sdp_core::{Diagnostics, NodeId, Traversal};
use sdp_network::{EdgeShape, GeometryCache, GeometrySource};
use sdp_output::{ForkEdge, ForkRow, MAX_FORK_BRANCHES};

use crate::record::{ForkOrientation, ForkRecord, PathStep};

/// Entry edge plus the widest supported branch set.
pub const FORK_MAX_EDGES: usize = MAX_FORK_BRANCHES + 1;

const FORK_MIN_EDGES: usize = 3;

fn touches(shape: &EdgeShape, node: NodeId) -> bool {
    shape.from_node == node || shape.to_node == node
}

/// Chain consecutive edges through shared node ids.  The first edge is
/// walked backward when its from-node is shared with the second edge.  A
/// later edge that does not continue the chain may still leave from the
/// node where the entry edge ends.
fn chain_by_nodes(shapes: &[&EdgeShape]) -> Result<Vec<Traversal>, usize> {
    let (first, second) = (shapes[0], shapes[1]);
    let (lead, junction) = if touches(second, first.from_node) {
        (Traversal::Against, first.from_node)
    } else if touches(second, first.to_node) {
        (Traversal::Along, first.to_node)
    } else {
        return Err(1);
    };

    let mut out = vec![lead];
    let mut prev = junction;
    for (i, shape) in shapes.iter().enumerate().skip(1) {
        let start = if touches(shape, prev) { prev } else { junction };
        if shape.from_node == start {
            out.push(Traversal::Along);
            prev = shape.to_node;
        } else if shape.to_node == start {
            out.push(Traversal::Against);
            prev = shape.from_node;
        } else {
            return Err(i);
        }
    }
    Ok(out)
}

/// Orient every edge relative to the junction: the entry edge ends there,
/// branches start there.
fn orient_at_junction(shapes: &[&EdgeShape], junction: NodeId) -> Result<Vec<Traversal>, usize> {
    shapes
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let toward = if junction == s.to_node {
                Traversal::Along
            } else if junction == s.from_node {
                Traversal::Against
            } else {
                return Err(i);
            };
            Ok(if i == 0 { toward } else { toward.flipped() })
        })
        .collect()
}

#[derive(Debug)]
pub struct ForkResolver {
    fcid: i64,
}

impl ForkResolver {
    pub fn new(fcid: i64) -> Self {
        Self { fcid }
    }

    pub fn resolve<S: GeometrySource + ?Sized>(
        &self,
        record: &ForkRecord,
        source: &S,
        cache: &mut GeometryCache,
        diag: &mut dyn Diagnostics,
    ) -> Option<ForkRow> {
        let id = record.id;
        let mut path: &[PathStep] = &record.path;
        if path.len() > FORK_MAX_EDGES {
            diag.warning(format!(
                "The road fork with ID {id} has more than {FORK_MAX_EDGES} parts. The road fork record will be \
                 truncated."
            ));
            path = &path[..FORK_MAX_EDGES];
        }
        if path.len() < FORK_MIN_EDGES {
            diag.warning(format!("The road fork with ID {id} has too few maneuvers."));
            return None;
        }
        let contiguous = path
            .iter()
            .zip(record.first_seq..)
            .all(|(step, expected)| step.seq == expected);
        if !contiguous {
            diag.warning(format!(
                "The sequence numbers of road fork ID {id} are not consecutive integers starting at {}.",
                record.first_seq
            ));
            return None;
        }

        for step in path {
            if cache.get(source, step.street).is_none() {
                diag.warning(format!(
                    "The Streets table is missing an entry with ID {}, which is used in road fork ID {id}.",
                    step.street
                ));
                return None;
            }
        }
        let shapes: Vec<&EdgeShape> = path.iter().filter_map(|s| cache.cached(s.street)).collect();

        let oriented = match record.orientation {
            ForkOrientation::SharedNodes => chain_by_nodes(&shapes),
            ForkOrientation::Junction(node) => orient_at_junction(&shapes, node),
        };
        let traversals = match oriented {
            Ok(t) => t,
            Err(i) => {
                let s = shapes[i];
                diag.warning(format!(
                    "Road fork ID {id} dropped: street {} (nodes {} and {}) shares no node with the rest of the fork.",
                    path[i].street, s.from_node, s.to_node
                ));
                return None;
            }
        };

        let mut edges = shapes.iter().zip(&traversals).map(|(s, t)| {
            let (frm, to) = t.positions();
            ForkEdge { fcid: self.fcid, fid: s.edge.oid(), frm_pos: frm as f64, to_pos: to as f64 }
        });
        let entry = edges.next()?;
        Some(ForkRow { id, entry, branches: edges.collect() })
    }

    pub fn resolve_all<S: GeometrySource + ?Sized>(
        &self,
        records: &[ForkRecord],
        source: &S,
        cache: &mut GeometryCache,
        diag: &mut dyn Diagnostics,
    ) -> Vec<ForkRow> {
        let rows: Vec<ForkRow> = records
            .iter()
            .filter_map(|r| self.resolve(r, source, cache, diag))
            .collect();
        log::debug!("road forks: {} of {} records emitted", rows.len(), records.len());
        rows
    }
}
