//! Signpost rows and their Signposts_Streets edge sequences.

use sdp_core::{Diagnostics, Edge1End, StreetId, Traversal};
use sdp_network::{EdgeShape, GeometryCache, GeometrySource};
use sdp_output::{MAX_SIGN_SLOTS, SignpostRow, SignpostStreetRow};

use crate::chain::{SIGNPOST_TRIM, join_oriented, stitch};
use crate::record::{PathStep, SignPath, SignpostRecord};

/// `Sequence` of the first and last edge when only the two ends of the
/// path are known.
const PAIR_FIRST_SEQ: i64 = 1;
const PAIR_LAST_SEQ: i64 = 0;

/// Both output tables of one run, written together.
#[derive(Clone, Debug, Default)]
pub struct SignpostTables {
    pub signposts: Vec<SignpostRow>,
    pub streets: Vec<SignpostStreetRow>,
}

/// Traversals of a source/destination pair from the node ids they share.
/// Pairs that share no node keep their digitized direction.
fn pair_traversals(src: &EdgeShape, dst: &EdgeShape) -> (Traversal, Traversal) {
    use Traversal::{Against, Along};
    if src.from_node == dst.from_node {
        (Against, Along)
    } else if src.from_node == dst.to_node {
        (Against, Against)
    } else if src.to_node == dst.to_node {
        (Along, Against)
    } else {
        (Along, Along)
    }
}

#[derive(Debug)]
pub struct SignpostBuilder {
    fcid: i64,
    next_object_id: i64,
}

impl SignpostBuilder {
    pub fn new(fcid: i64) -> Self {
        Self { fcid, next_object_id: 1 }
    }

    fn street_row(&self, signpost_id: i64, sequence: i64, shape: &EdgeShape, t: Traversal) -> SignpostStreetRow {
        let (frm, to) = t.positions();
        SignpostStreetRow {
            signpost_id,
            sequence,
            fcid: self.fcid,
            fid: shape.edge.oid(),
            frm_pos: frm as f64,
            to_pos: to as f64,
        }
    }

    /// Fetch every street of the path or warn about the first missing one.
    fn fetch<S: GeometrySource + ?Sized>(
        streets: &[StreetId],
        source: &S,
        cache: &mut GeometryCache,
        diag: &mut dyn Diagnostics,
    ) -> bool {
        for &street in streets {
            if cache.get(source, street).is_none() {
                diag.warning(format!(
                    "The Streets table is missing an entry with ID {street}, which is used in the signpost table."
                ));
                return false;
            }
        }
        true
    }

    /// Build one signpost and append its rows to `out`.  Returns `false` when
    /// the record was skipped.
    pub fn build<S: GeometrySource + ?Sized>(
        &mut self,
        record: &SignpostRecord,
        source: &S,
        cache: &mut GeometryCache,
        out: &mut SignpostTables,
        diag: &mut dyn Diagnostics,
    ) -> bool {
        let object_id = self.next_object_id;
        let (shape, streets) = match &record.path {
            SignPath::Pair { src, dst } => {
                if !Self::fetch(&[*src, *dst], source, cache, diag) {
                    return false;
                }
                let (Some(a), Some(b)) = (cache.cached(*src), cache.cached(*dst)) else {
                    return false;
                };
                let (ta, tb) = pair_traversals(a, b);
                let Some(shape) = join_oriented(&[&a.geometry, &b.geometry], &[ta, tb], SIGNPOST_TRIM) else {
                    return false;
                };
                let streets = vec![
                    self.street_row(object_id, PAIR_FIRST_SEQ, a, ta),
                    self.street_row(object_id, PAIR_LAST_SEQ, b, tb),
                ];
                (shape, streets)
            }
            SignPath::Sequence(steps) => {
                let mut steps: Vec<PathStep> = steps.clone();
                steps.sort_by_key(|s| s.seq);
                if steps.len() < 2 {
                    diag.warning(format!(
                        "The signpost path had fewer than two entries for sign ID {}.",
                        record.source_id
                    ));
                    return false;
                }
                let ids: Vec<StreetId> = steps.iter().map(|s| s.street).collect();
                if !Self::fetch(&ids, source, cache, diag) {
                    return false;
                }
                let shapes: Vec<&EdgeShape> = ids.iter().filter_map(|&s| cache.cached(s)).collect();
                let lines: Vec<_> = shapes.iter().map(|s| &s.geometry).collect();
                let Some(chain) = stitch(&lines, Edge1End::Unknown, SIGNPOST_TRIM) else {
                    return false;
                };
                if chain.mismatch {
                    diag.warning(format!(
                        "Signpost geometry may be incorrect for Signpost ObjectID {object_id} because the geometry \
                         of adjacent street segments used to build the signpost geometry did not have coincident \
                         endpoints."
                    ));
                }
                let streets = shapes
                    .iter()
                    .zip(&steps)
                    .zip(&chain.traversals)
                    .map(|((shape, step), &t)| self.street_row(object_id, step.seq, shape, t))
                    .collect();
                (chain.shape, streets)
            }
        };

        let truncated = record.branches.len() > MAX_SIGN_SLOTS || record.towards.len() > MAX_SIGN_SLOTS;
        if truncated {
            diag.warning(format!(
                "There were too many sign text records for sign ID {}. The signpost (ObjectID {object_id}) will be \
                 truncated.",
                record.source_id
            ));
        }

        out.signposts.push(SignpostRow {
            object_id,
            exit_name: record.exit_name.clone(),
            branches: record.branches.iter().take(MAX_SIGN_SLOTS).cloned().collect(),
            towards: record.towards.iter().take(MAX_SIGN_SLOTS).cloned().collect(),
            shape,
        });
        out.streets.extend(streets);
        self.next_object_id += 1;
        true
    }

    pub fn build_all<S: GeometrySource + ?Sized>(
        &mut self,
        records: &[SignpostRecord],
        source: &S,
        cache: &mut GeometryCache,
        diag: &mut dyn Diagnostics,
    ) -> SignpostTables {
        let mut out = SignpostTables::default();
        for record in records {
            self.build(record, source, cache, &mut out, diag);
        }
        log::debug!(
            "signposts: {} of {} records emitted, {} street rows",
            out.signposts.len(),
            records.len(),
            out.streets.len()
        );
        out
    }
}
