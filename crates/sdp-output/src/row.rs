//! One row type per output table.
//!
//! Edge references (`*FCID`, `*FID`) point into the Streets table: the FCID
//! is the configured class id of that table and the FID the edge object id.

use std::collections::BTreeMap;

use sdp_core::{Edge1End, Polyline, SliceGranularity, Weekday};
use sdp_network::{AttrValue, Edge, EdgeTable};

use crate::schema::{Column, ColumnType, Record, Schema, Value, infer_columns};

/// Branch and toward slots on one signpost.
pub const MAX_SIGN_SLOTS: usize = 10;

/// Branch columns on one road fork (one entry edge plus up to three).
pub const MAX_FORK_BRANCHES: usize = 3;

// ── Streets ───────────────────────────────────────────────────────────────────

/// Column set of the Streets table.
#[derive(Clone, Debug)]
pub struct StreetLayout {
    pub id_column: &'static str,
    pub from_column: &'static str,
    pub to_column: &'static str,
    pub attr_columns: Vec<Column>,
}

impl StreetLayout {
    /// Layout covering every field registered on `table`.
    pub fn from_table(
        table: &EdgeTable,
        id_column: &'static str,
        from_column: &'static str,
        to_column: &'static str,
    ) -> Self {
        let attr_columns = infer_columns(table.fields(), table.iter().flat_map(|(_, e)| e.attrs()));
        Self { id_column, from_column, to_column, attr_columns }
    }
}

/// A prepared edge, borrowed from the edge table.
#[derive(Clone, Copy, Debug)]
pub struct StreetRow<'a> {
    pub object_id: i64,
    pub edge: &'a Edge,
}

impl Record for StreetRow<'_> {
    type Layout = StreetLayout;

    fn schema(layout: &StreetLayout) -> Schema {
        let mut s = Schema::new("Streets")
            .col("ObjectID", ColumnType::Int)
            .col(layout.id_column, ColumnType::Int)
            .col(layout.from_column, ColumnType::Int)
            .col(layout.to_column, ColumnType::Int)
            .col("Meters", ColumnType::Float)
            .col("KPH", ColumnType::Float);
        s.columns.extend(layout.attr_columns.iter().cloned());
        s.push("Shape", ColumnType::Text);
        s
    }

    fn values(&self, layout: &StreetLayout) -> Vec<Value> {
        let e = self.edge;
        let mut v = Vec::with_capacity(7 + layout.attr_columns.len());
        v.push(Value::Int(self.object_id));
        v.push(Value::Int(e.street_id.0));
        v.push(Value::Int(e.from_node.0));
        v.push(Value::Int(e.to_node.0));
        v.push(Value::Float(e.meters));
        v.push(Value::Float(e.kph));
        for col in &layout.attr_columns {
            v.push(e.attr(&col.name).map_or(Value::Null, |a| Value::from(a).coerce(col.ty)));
        }
        v.push(Value::Text(e.geometry.to_wkt_string()));
        v
    }
}

// ── RestrictedTurns ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnEdge {
    pub fcid: i64,
    pub fid: i64,
    pub pos: f64,
}

#[derive(Clone, Debug)]
pub struct TurnLayout {
    /// `COND_ID` (HERE) or `ID` (MultiNet).
    pub id_column: &'static str,
    pub with_cond_type: bool,
    pub max_edges: usize,
    pub restriction_columns: Vec<Column>,
}

#[derive(Clone, Debug)]
pub struct TurnRow {
    pub object_id: i64,
    pub maneuver_id: i64,
    pub cond_type: Option<i64>,
    pub edge1_end: Edge1End,
    pub edges: Vec<TurnEdge>,
    pub restrictions: BTreeMap<String, AttrValue>,
    pub shape: Polyline,
}

impl Record for TurnRow {
    type Layout = TurnLayout;

    fn schema(layout: &TurnLayout) -> Schema {
        let mut s = Schema::new("RestrictedTurns")
            .col("ObjectID", ColumnType::Int)
            .col(layout.id_column, ColumnType::Int);
        if layout.with_cond_type {
            s.push("COND_TYPE", ColumnType::Int);
        }
        s.push("Edge1End", ColumnType::Text);
        for i in 1..=layout.max_edges {
            s.push(format!("Edge{i}FCID"), ColumnType::Int);
            s.push(format!("Edge{i}FID"), ColumnType::Int);
            s.push(format!("Edge{i}Pos"), ColumnType::Float);
        }
        s.columns.extend(layout.restriction_columns.iter().cloned());
        s.push("Shape", ColumnType::Text);
        s
    }

    fn values(&self, layout: &TurnLayout) -> Vec<Value> {
        let mut v = vec![Value::Int(self.object_id), Value::Int(self.maneuver_id)];
        if layout.with_cond_type {
            v.push(self.cond_type.into());
        }
        v.push(Value::from(self.edge1_end.as_str()));
        for i in 0..layout.max_edges {
            match self.edges.get(i) {
                Some(e) => v.extend([Value::Int(e.fcid), Value::Int(e.fid), Value::Float(e.pos)]),
                None => v.extend([Value::Null, Value::Null, Value::Null]),
            }
        }
        for col in &layout.restriction_columns {
            v.push(self.restrictions.get(&col.name).map_or(Value::Null, |a| Value::from(a).coerce(col.ty)));
        }
        v.push(Value::Text(self.shape.to_wkt_string()));
        v
    }
}

// ── Streets_RoadSplits ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForkEdge {
    pub fcid: i64,
    pub fid: i64,
    pub frm_pos: f64,
    pub to_pos: f64,
}

impl ForkEdge {
    fn push_values(edge: Option<&ForkEdge>, v: &mut Vec<Value>) {
        match edge {
            Some(e) => v.extend([
                Value::Int(e.fcid),
                Value::Int(e.fid),
                Value::Float(e.frm_pos),
                Value::Float(e.to_pos),
            ]),
            None => v.extend([Value::Null, Value::Null, Value::Null, Value::Null]),
        }
    }
}

/// Entry edge plus two or three branches.
#[derive(Clone, Debug, PartialEq)]
pub struct ForkRow {
    pub id: i64,
    pub entry: ForkEdge,
    pub branches: Vec<ForkEdge>,
}

fn push_edge_ref_columns(s: &mut Schema, prefix: &str) {
    s.push(format!("{prefix}FCID"), ColumnType::Int);
    s.push(format!("{prefix}FID"), ColumnType::Int);
    s.push(format!("{prefix}FrmPos"), ColumnType::Float);
    s.push(format!("{prefix}ToPos"), ColumnType::Float);
}

impl Record for ForkRow {
    type Layout = ();

    fn schema(_: &()) -> Schema {
        let mut s = Schema::new("Streets_RoadSplits").col("ID", ColumnType::Int);
        push_edge_ref_columns(&mut s, "Edge");
        for i in 0..MAX_FORK_BRANCHES {
            push_edge_ref_columns(&mut s, &format!("Branch{i}"));
        }
        s
    }

    fn values(&self, _: &()) -> Vec<Value> {
        let mut v = vec![Value::Int(self.id)];
        ForkEdge::push_values(Some(&self.entry), &mut v);
        for i in 0..MAX_FORK_BRANCHES {
            ForkEdge::push_values(self.branches.get(i), &mut v);
        }
        v
    }
}

// ── Signposts ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchText {
    pub text: String,
    pub dir: Option<String>,
    pub lang: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignText {
    pub text: String,
    pub lang: String,
}

#[derive(Clone, Debug)]
pub struct SignpostRow {
    pub object_id: i64,
    pub exit_name: String,
    pub branches: Vec<BranchText>,
    pub towards: Vec<SignText>,
    pub shape: Polyline,
}

impl Record for SignpostRow {
    type Layout = ();

    fn schema(_: &()) -> Schema {
        let mut s = Schema::new("Signposts")
            .col("ObjectID", ColumnType::Int)
            .col("ExitName", ColumnType::Text);
        for i in 0..MAX_SIGN_SLOTS {
            s.push(format!("Branch{i}"), ColumnType::Text);
            s.push(format!("Branch{i}Dir"), ColumnType::Text);
            s.push(format!("Branch{i}Lng"), ColumnType::Text);
            s.push(format!("Toward{i}"), ColumnType::Text);
            s.push(format!("Toward{i}Lng"), ColumnType::Text);
        }
        s.push("Shape", ColumnType::Text);
        s
    }

    fn values(&self, _: &()) -> Vec<Value> {
        let mut v = vec![Value::Int(self.object_id), Value::from(self.exit_name.as_str())];
        for i in 0..MAX_SIGN_SLOTS {
            match self.branches.get(i) {
                Some(b) => v.extend([
                    Value::from(b.text.as_str()),
                    Value::from(b.dir.clone()),
                    Value::from(b.lang.as_str()),
                ]),
                None => v.extend([Value::Null, Value::Null, Value::Null]),
            }
            match self.towards.get(i) {
                Some(t) => v.extend([Value::from(t.text.as_str()), Value::from(t.lang.as_str())]),
                None => v.extend([Value::Null, Value::Null]),
            }
        }
        v.push(Value::Text(self.shape.to_wkt_string()));
        v
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignpostStreetRow {
    pub signpost_id: i64,
    pub sequence: i64,
    pub fcid: i64,
    pub fid: i64,
    pub frm_pos: f64,
    pub to_pos: f64,
}

impl Record for SignpostStreetRow {
    type Layout = ();

    fn schema(_: &()) -> Schema {
        let mut s = Schema::new("Signposts_Streets")
            .col("SignpostID", ColumnType::Int)
            .col("Sequence", ColumnType::Int);
        push_edge_ref_columns(&mut s, "Edge");
        s
    }

    fn values(&self, _: &()) -> Vec<Value> {
        vec![
            Value::Int(self.signpost_id),
            Value::Int(self.sequence),
            Value::Int(self.fcid),
            Value::Int(self.fid),
            Value::Float(self.frm_pos),
            Value::Float(self.to_pos),
        ]
    }
}

// ── Patterns / DailyProfiles ──────────────────────────────────────────────────

/// `Patterns` (HERE, 15-minute, with speeds) or `DailyProfiles`
/// (MultiNet, 5-minute).
///
/// HERE street patterns reference a profile by its object id, MultiNet by
/// the vendor profile id, so only the HERE table carries `ObjectID`.
#[derive(Clone, Debug)]
pub struct ProfileLayout {
    pub table: &'static str,
    pub id_column: &'static str,
    pub granularity: SliceGranularity,
    pub with_object_id: bool,
    pub with_speeds: bool,
}

impl ProfileLayout {
    pub fn here() -> Self {
        Self {
            table: "Patterns",
            id_column: "PatternID",
            granularity: SliceGranularity::Minutes15,
            with_object_id: true,
            with_speeds: true,
        }
    }

    pub fn multinet() -> Self {
        Self {
            table: "DailyProfiles",
            id_column: "ProfileID",
            granularity: SliceGranularity::Minutes5,
            with_object_id: false,
            with_speeds: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfileRow {
    pub object_id: i64,
    pub profile_id: i64,
    pub base_speed: Option<f64>,
    pub average_speed: Option<f64>,
    /// One factor per slice; missing trailing slices are written empty.
    pub factors: Vec<f64>,
}

impl Record for ProfileRow {
    type Layout = ProfileLayout;

    fn schema(layout: &ProfileLayout) -> Schema {
        let mut s = Schema::new(layout.table);
        if layout.with_object_id {
            s.push("ObjectID", ColumnType::Int);
        }
        s.push(layout.id_column, ColumnType::Int);
        if layout.with_speeds {
            s.push("BaseSpeed", ColumnType::Float);
            s.push("AverageSpeed", ColumnType::Float);
        }
        for i in 0..layout.granularity.slice_count() {
            s.push(format!("SpeedFactor_{}", layout.granularity.label(i)), ColumnType::Float);
        }
        s
    }

    fn values(&self, layout: &ProfileLayout) -> Vec<Value> {
        let mut v = Vec::with_capacity(3 + self.factors.len());
        if layout.with_object_id {
            v.push(Value::Int(self.object_id));
        }
        v.push(Value::Int(self.profile_id));
        if layout.with_speeds {
            v.push(self.base_speed.into());
            v.push(self.average_speed.into());
        }
        for i in 0..layout.granularity.slice_count() {
            v.push(self.factors.get(i).copied().into());
        }
        v
    }
}

// ── Streets_Patterns (HERE) ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default)]
pub struct StreetPatternLayout {
    pub with_tmc: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StreetPatternRow {
    pub link_id: i64,
    pub tmc: Option<String>,
    /// Pattern object id per weekday, Sunday first.
    pub days: [i64; 7],
    pub fcid: i64,
    pub fid: i64,
    pub frm_pos: f64,
    pub to_pos: f64,
    pub average_speed: f64,
    pub base_speed: f64,
}

impl Record for StreetPatternRow {
    type Layout = StreetPatternLayout;

    fn schema(layout: &StreetPatternLayout) -> Schema {
        let mut s = Schema::new("Streets_Patterns").col("LINK_ID", ColumnType::Int);
        if layout.with_tmc {
            s.push("TMC", ColumnType::Text);
        }
        for day in Weekday::ALL {
            s.push(day.code(), ColumnType::Int);
        }
        push_edge_ref_columns(&mut s, "Edge");
        s.push("AverageSpeed", ColumnType::Float);
        s.push("BaseSpeed", ColumnType::Float);
        s
    }

    fn values(&self, layout: &StreetPatternLayout) -> Vec<Value> {
        let mut v = vec![Value::Int(self.link_id)];
        if layout.with_tmc {
            v.push(self.tmc.clone().into());
        }
        v.extend(self.days.iter().map(|&d| Value::Int(d)));
        v.extend([
            Value::Int(self.fcid),
            Value::Int(self.fid),
            Value::Float(self.frm_pos),
            Value::Float(self.to_pos),
            Value::Float(self.average_speed),
            Value::Float(self.base_speed),
        ]);
        v
    }
}

// ── Streets_DailyProfiles (MultiNet) ──────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct DailyProfileRow {
    pub network_id: i64,
    pub val_dir: i64,
    pub sp_free_flow: f64,
    pub sp_weekday: f64,
    pub sp_weekend: f64,
    pub sp_week: f64,
    /// `PROFILE_1` (Sunday) .. `PROFILE_7` (Saturday).
    pub profiles: [i64; 7],
    pub fcid: i64,
    pub fid: i64,
    pub frm_pos: f64,
    pub to_pos: f64,
}

impl Record for DailyProfileRow {
    type Layout = ();

    fn schema(_: &()) -> Schema {
        let mut s = Schema::new("Streets_DailyProfiles")
            .col("NETWORK_ID", ColumnType::Int)
            .col("VAL_DIR", ColumnType::Int)
            .col("SPFREEFLOW", ColumnType::Float)
            .col("SPWEEKDAY", ColumnType::Float)
            .col("SPWEEKEND", ColumnType::Float)
            .col("SPWEEK", ColumnType::Float);
        for i in 1..=7 {
            s.push(format!("PROFILE_{i}"), ColumnType::Int);
        }
        push_edge_ref_columns(&mut s, "Edge");
        s
    }

    fn values(&self, _: &()) -> Vec<Value> {
        let mut v = vec![
            Value::Int(self.network_id),
            Value::Int(self.val_dir),
            Value::Float(self.sp_free_flow),
            Value::Float(self.sp_weekday),
            Value::Float(self.sp_weekend),
            Value::Float(self.sp_week),
        ];
        v.extend(self.profiles.iter().map(|&p| Value::Int(p)));
        v.extend([
            Value::Int(self.fcid),
            Value::Int(self.fid),
            Value::Float(self.frm_pos),
            Value::Float(self.to_pos),
        ]);
        v
    }
}

// ── Streets_TMC ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
pub struct TmcLayout {
    pub id_column: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StreetTmcRow {
    pub street_id: i64,
    pub tmc: String,
    pub fcid: i64,
    pub fid: i64,
    pub frm_pos: f64,
    pub to_pos: f64,
}

impl Record for StreetTmcRow {
    type Layout = TmcLayout;

    fn schema(layout: &TmcLayout) -> Schema {
        let mut s = Schema::new("Streets_TMC")
            .col(layout.id_column, ColumnType::Int)
            .col("TMC", ColumnType::Text);
        push_edge_ref_columns(&mut s, "Edge");
        s
    }

    fn values(&self, _: &TmcLayout) -> Vec<Value> {
        vec![
            Value::Int(self.street_id),
            Value::from(self.tmc.as_str()),
            Value::Int(self.fcid),
            Value::Int(self.fid),
            Value::Float(self.frm_pos),
            Value::Float(self.to_pos),
        ]
    }
}

// ── TimeZones ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeZoneRow {
    pub name: String,
}

impl Record for TimeZoneRow {
    type Layout = ();

    fn schema(_: &()) -> Schema {
        Schema::new("TimeZones").col("MSTIMEZONE", ColumnType::Text)
    }

    fn values(&self, _: &()) -> Vec<Value> {
        vec![Value::from(self.name.as_str())]
    }
}
