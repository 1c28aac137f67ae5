//! Orienting, trimming and joining edge geometries into one maneuver line.
//!
//! The first and last edges are cut down to the fraction nearest the
//! junction they share with their neighbour; middle edges are kept whole.
//! Joins never repeat a vertex.

use sdp_core::{Edge1End, Polyline, Traversal};

/// Fraction of the first and last edge kept for a turn.
pub const TURN_TRIM: f64 = 0.3;

/// Fraction of the first and last edge kept for a signpost.
pub const SIGNPOST_TRIM: f64 = 0.25;

/// A stitched maneuver line.
#[derive(Clone, Debug)]
pub struct Chain {
    pub shape: Polyline,
    /// One entry per input edge.
    pub traversals: Vec<Traversal>,
    /// Some edge touched the chain at neither end and was taken forward.
    pub mismatch: bool,
}

/// The part of the first edge that leads into the junction, walked toward it.
fn lead_in(line: &Polyline, traversal: Traversal, trim: f64) -> Polyline {
    match traversal {
        Traversal::Along => line.segment_along(1.0 - trim, 1.0),
        Traversal::Against => line.segment_along(0.0, trim).reversed(),
    }
}

/// The part of the last edge that leaves the previous junction.
fn lead_out(line: &Polyline, traversal: Traversal, trim: f64) -> Polyline {
    match traversal {
        Traversal::Along => line.segment_along(0.0, trim),
        Traversal::Against => line.segment_along(1.0 - trim, 1.0).reversed(),
    }
}

fn whole(line: &Polyline, traversal: Traversal) -> Polyline {
    match traversal {
        Traversal::Along => line.clone(),
        Traversal::Against => line.reversed(),
    }
}

fn piece(line: &Polyline, traversal: Traversal, index: usize, count: usize, trim: f64) -> Polyline {
    if index == 0 {
        lead_in(line, traversal, trim)
    } else if index + 1 == count {
        lead_out(line, traversal, trim)
    } else {
        whole(line, traversal)
    }
}

/// Traversal of the first edge.  With no explicit flag the edge is walked
/// backward when its first vertex touches either end of the second edge.
fn first_traversal(first: &Polyline, second: &Polyline, start: Edge1End) -> Traversal {
    match start {
        Edge1End::Yes => Traversal::Along,
        Edge1End::No => Traversal::Against,
        Edge1End::Unknown => {
            let head = first.first();
            if head.coincides(second.first()) || head.coincides(second.last()) {
                Traversal::Against
            } else {
                Traversal::Along
            }
        }
    }
}

/// Orient and join `lines` (at least two) into one polyline.
///
/// Each edge after the first is oriented against the current chain end.  An
/// edge that touches it at neither end is taken forward and `mismatch` is
/// set; the caller decides how to report that.
pub fn stitch(lines: &[&Polyline], start: Edge1End, trim: f64) -> Option<Chain> {
    let [first, second, ..] = lines else {
        return None;
    };
    let count = lines.len();

    let lead = first_traversal(first, second, start);
    let mut shape = piece(first, lead, 0, count, trim);
    let mut traversals = Vec::with_capacity(count);
    traversals.push(lead);
    let mut mismatch = false;

    for (i, line) in lines.iter().enumerate().skip(1) {
        let end = shape.last();
        let traversal = if line.first().coincides(end) {
            Traversal::Along
        } else if line.last().coincides(end) {
            Traversal::Against
        } else {
            mismatch = true;
            Traversal::Along
        };
        shape.extend_joined(&piece(line, traversal, i, count, trim));
        traversals.push(traversal);
    }

    Some(Chain { shape, traversals, mismatch })
}

/// Join `lines` with traversals already decided.  Nothing is checked; a gap
/// between two edges becomes a straight connecting segment.
pub fn join_oriented(lines: &[&Polyline], traversals: &[Traversal], trim: f64) -> Option<Polyline> {
    if lines.len() < 2 || lines.len() != traversals.len() {
        return None;
    }
    let count = lines.len();
    let mut shape = piece(lines[0], traversals[0], 0, count, trim);
    for (i, (line, &t)) in lines.iter().zip(traversals).enumerate().skip(1) {
        shape.extend_joined(&piece(line, t, i, count, trim));
    }
    Some(shape)
}
