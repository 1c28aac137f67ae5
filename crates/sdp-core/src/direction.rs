//! Traversal directions of an edge and the start-end flag of a maneuver.

use std::fmt;

// ── Direction ─────────────────────────────────────────────────────────────────

/// Which traversal(s) of an edge an attribute applies to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// From-to: along the digitized direction.
    FromTo,
    /// To-from: against the digitized direction.
    ToFrom,
    Both,
}

impl Direction {
    #[inline]
    pub fn includes_ft(self) -> bool {
        matches!(self, Direction::FromTo | Direction::Both)
    }

    #[inline]
    pub fn includes_tf(self) -> bool {
        matches!(self, Direction::ToFrom | Direction::Both)
    }

    /// Attribute name prefixes this direction writes (`FT_`, `TF_`).
    pub fn prefixes(self) -> &'static [&'static str] {
        match self {
            Direction::FromTo => &["FT_"],
            Direction::ToFrom => &["TF_"],
            Direction::Both => &["FT_", "TF_"],
        }
    }

    /// Merge two direction sets.
    pub fn union(self, other: Direction) -> Direction {
        let ft = self.includes_ft() || other.includes_ft();
        let tf = self.includes_tf() || other.includes_tf();
        match (ft, tf) {
            (true, true) => Direction::Both,
            (true, false) => Direction::FromTo,
            _ => Direction::ToFrom,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::FromTo => "FT",
            Direction::ToFrom => "TF",
            Direction::Both => "B",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Edge1End ──────────────────────────────────────────────────────────────────

/// Which endpoint of the first edge a maneuver leaves from.
///
/// `Yes` means the maneuver starts at the digitized end of edge 1 (so edge 1
/// is traversed forward), `No` that it starts at the digitized start, and
/// `Unknown` that orientation must be inferred from geometry.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Edge1End {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Edge1End {
    pub fn as_str(self) -> &'static str {
        match self {
            Edge1End::Yes => "Y",
            Edge1End::No => "N",
            Edge1End::Unknown => "?",
        }
    }
}

impl fmt::Display for Edge1End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Traversal ─────────────────────────────────────────────────────────────────

/// How one edge of a maneuver is traversed relative to its digitization.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Traversal {
    /// Start to end: positions `[0, 1]`.
    Along,
    /// End to start: positions `[1, 0]`.
    Against,
}

impl Traversal {
    /// `(from_pos, to_pos)` as written to `*FrmPos` / `*ToPos` columns.
    #[inline]
    pub fn positions(self) -> (i64, i64) {
        match self {
            Traversal::Along => (0, 1),
            Traversal::Against => (1, 0),
        }
    }

    #[inline]
    pub fn flipped(self) -> Traversal {
        match self {
            Traversal::Along => Traversal::Against,
            Traversal::Against => Traversal::Along,
        }
    }
}
