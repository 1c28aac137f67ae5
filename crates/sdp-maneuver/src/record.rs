//! Vendor-neutral maneuver inputs.
//!
//! Adapters group and sort the raw vendor rows; these records carry only what
//! the builders need.

use sdp_core::{Edge1End, NodeId, StreetId};
use sdp_output::{BranchText, SignText};

/// One edge of a maneuver path with its vendor sequence number.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub street: StreetId,
    pub seq: i64,
}

impl PathStep {
    pub fn new(street: i64, seq: i64) -> Self {
        Self { street: StreetId(street), seq }
    }
}

/// How the first edge of a turn is oriented.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StartHint {
    /// The vendor states it directly (HERE `END_OF_LK`).
    Flag(Edge1End),
    /// The junction node the maneuver passes through (MultiNet `JNCTID`).
    Junction(NodeId),
}

/// A restricted turn: an ordered edge sequence.
#[derive(Clone, Debug)]
pub struct ManeuverRecord {
    pub id: i64,
    pub cond_type: Option<i64>,
    pub streets: Vec<StreetId>,
    pub start: StartHint,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ForkOrientation {
    /// Chain consecutive edges through the node ids they share.
    SharedNodes,
    /// Every edge touches this junction node.
    Junction(NodeId),
}

/// One road fork: entry edge then two or three branches.
#[derive(Clone, Debug)]
pub struct ForkRecord {
    pub id: i64,
    pub path: Vec<PathStep>,
    /// Sequence number the first step must carry.
    pub first_seq: i64,
    pub orientation: ForkOrientation,
}

#[derive(Clone, Debug)]
pub enum SignPath {
    /// Source and destination edge only; orientation from shared node ids.
    Pair { src: StreetId, dst: StreetId },
    /// Full edge sequence; orientation from geometry.
    Sequence(Vec<PathStep>),
}

/// A signpost with its display texts, in vendor order.
#[derive(Clone, Debug)]
pub struct SignpostRecord {
    /// Vendor sign id, used in warnings.
    pub source_id: i64,
    pub path: SignPath,
    pub exit_name: String,
    pub branches: Vec<BranchText>,
    pub towards: Vec<SignText>,
}
