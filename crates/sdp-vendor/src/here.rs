//! HERE NAVSTREETS adapter.
//!
//! # Tables
//!
//! | Table                  | Used for                                          |
//! |------------------------|---------------------------------------------------|
//! | `Streets`              | edges, names, speed category                      |
//! | `AltStreets` *(opt)*   | `*_Alt` name fields                               |
//! | `Zlevels` *(opt)*      | `F_ZLEV` / `T_ZLEV`                               |
//! | `Cdms`                 | condition types and `AR_*` access flags           |
//! | `Rdms`                 | maneuver paths of turns and forks                 |
//! | `CndMod_US` / `CndMod_NonUS` *(opt)* | transport condition modifiers       |
//! | `Signs`                | signposts                                         |
//! | `Traffic`              | TMC codes per link                                |
//! | `SpeedProfiles`        | SPD speed patterns (`PATTERN_ID`, `H00_00`…)      |
//! | `LinkReference_FC1_4` / `LinkReference_FC5` | link pattern references      |
//! | `TmcReference`         | TMC pattern references                            |
//!
//! Edges keep the vendor digitization: `REF_IN_ID` is the from node and
//! `NREF_IN_ID` the to node.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use sdp_core::{ConditionId, Diagnostics, Edge1End, NodeId, Polyline, SliceGranularity, StreetId};
use sdp_maneuver::{ForkOrientation, ForkRecord, ManeuverRecord, PathStep, SignPath, SignpostRecord, StartHint};
use sdp_network::{AttrValue, Edge, EdgeTable, EdgeTableBuilder};
use sdp_output::{BranchText, SignText, StreetTmcRow};
use sdp_restrict::vocab::here::{self, UnitSystem};
use sdp_restrict::{DirectionIndicator, DirectionSource, PREFERRED_TRUCK_ROUTE, RestrictionRecord};
use sdp_traffic::{
    LinkPatternRef, PatternAssignment, PatternCatalog, SpeedPattern, TmcPatternRef, TmcTrafficRef, build_patterns,
    here_tmc_rows, link_assignments, merge_patterns, tmc_assignments,
};

use crate::adapter::{HistoricalTraffic, ManeuverTable, RestrictionTable, TrafficTable, VendorAdapter};
use crate::source::{DEFAULT_CHUNK_SIZE, RowSource};
use crate::{VendorError, VendorResult, lang};

pub mod tables {
    pub const STREETS: &str = "Streets";
    pub const ALT_STREETS: &str = "AltStreets";
    pub const Z_LEVELS: &str = "Zlevels";
    pub const CDMS: &str = "Cdms";
    pub const RDMS: &str = "Rdms";
    pub const CNDMOD_US: &str = "CndMod_US";
    pub const CNDMOD_NON_US: &str = "CndMod_NonUS";
    pub const SIGNS: &str = "Signs";
    pub const TRAFFIC: &str = "Traffic";
    pub const SPEED_PROFILES: &str = "SpeedProfiles";
    pub const LINK_REFERENCE_FC1_4: &str = "LinkReference_FC1_4";
    pub const LINK_REFERENCE_FC5: &str = "LinkReference_FC5";
    pub const TMC_REFERENCE: &str = "TmcReference";
}

/// Suffixes of the `AR_*` access flags in `Cdms`.
pub const ACCESS_SUFFIXES: [&str; 10] =
    ["AUTO", "BUS", "TAXIS", "CARPOOL", "PEDSTRN", "TRUCKS", "THRUTR", "DELIVER", "EMERVEH", "MOTOR"];

const ALT_NAME_FIELDS: [&str; 8] = [
    "ST_NAME_Alt",
    "ST_LANGCD_Alt",
    "ST_NM_PREF_Alt",
    "ST_TYP_BEF_Alt",
    "ST_NM_BASE_Alt",
    "ST_NM_SUFF_Alt",
    "ST_TYP_AFT_Alt",
    "DIRONSIGN_Alt",
];

/// Free-flow speed of a `SPEED_CAT`, raised by 20 % on controlled-access
/// roads.
pub fn kph(speed_cat: &str, contracc: &str) -> f64 {
    let base = match speed_cat.trim() {
        "1" => 112.0,
        "2" => 92.0,
        "3" => 76.0,
        "4" => 64.0,
        "5" => 48.0,
        "6" => 32.0,
        "7" => 16.0,
        "8" => 4.0,
        _ => 1.0,
    };
    if contracc.trim() == "Y" { base * 1.2 } else { base }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct StreetRecord {
    link_id: i64,
    ref_in_id: i64,
    nref_in_id: i64,
    #[serde(default)]
    speed_cat: String,
    #[serde(default)]
    contracc: String,
    #[serde(default)]
    st_name: String,
    #[serde(default)]
    st_langcd: String,
    #[serde(default)]
    st_nm_pref: String,
    #[serde(default)]
    st_typ_bef: String,
    #[serde(default)]
    st_nm_base: String,
    #[serde(default)]
    st_nm_suff: String,
    #[serde(default)]
    st_typ_aft: String,
    #[serde(default)]
    dironsign: String,
    shape: String,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct AltStreetRecord {
    link_id: i64,
    #[serde(default)]
    st_name: String,
    #[serde(default)]
    st_langcd: String,
    #[serde(default)]
    st_nm_pref: String,
    #[serde(default)]
    st_typ_bef: String,
    #[serde(default)]
    st_nm_base: String,
    #[serde(default)]
    st_nm_suff: String,
    #[serde(default)]
    st_typ_aft: String,
    #[serde(default)]
    dironsign: String,
    #[serde(default)]
    explicatbl: String,
}

impl AltStreetRecord {
    fn differs_from(&self, s: &StreetRecord) -> bool {
        self.st_typ_bef != s.st_typ_bef || self.st_nm_base != s.st_nm_base || self.st_typ_aft != s.st_typ_aft
    }

    /// Values in [`ALT_NAME_FIELDS`] order.
    fn values(&self) -> [&str; 8] {
        [
            &self.st_name,
            &self.st_langcd,
            &self.st_nm_pref,
            &self.st_typ_bef,
            &self.st_nm_base,
            &self.st_nm_suff,
            &self.st_typ_aft,
            &self.dironsign,
        ]
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct ZLevelRecord {
    link_id: i64,
    point_num: i64,
    z_level: i64,
    #[serde(default)]
    intrsect: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct CdmsRecord {
    link_id: i64,
    cond_id: i64,
    cond_type: i64,
    #[serde(default)]
    end_of_lk: String,
    #[serde(default)]
    ar_auto: String,
    #[serde(default)]
    ar_bus: String,
    #[serde(default)]
    ar_taxis: String,
    #[serde(default)]
    ar_carpool: String,
    #[serde(default)]
    ar_pedstrn: String,
    #[serde(default)]
    ar_trucks: String,
    #[serde(default)]
    ar_thrutr: String,
    #[serde(default)]
    ar_deliver: String,
    #[serde(default)]
    ar_emerveh: String,
    #[serde(default)]
    ar_motor: String,
}

impl CdmsRecord {
    /// `(suffix, value)` in [`ACCESS_SUFFIXES`] order.
    fn access(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let values = [
            &self.ar_auto,
            &self.ar_bus,
            &self.ar_taxis,
            &self.ar_carpool,
            &self.ar_pedstrn,
            &self.ar_trucks,
            &self.ar_thrutr,
            &self.ar_deliver,
            &self.ar_emerveh,
            &self.ar_motor,
        ];
        ACCESS_SUFFIXES.into_iter().zip(values.map(String::as_str))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct CndModRecord {
    cond_id: i64,
    mod_type: i64,
    #[serde(default)]
    mod_val: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RdmsRecord {
    link_id: i64,
    man_linkid: i64,
    cond_id: i64,
    seq_number: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct SignRecord {
    seq_num: i64,
    #[serde(default)]
    exit_num: String,
    src_linkid: i64,
    dst_linkid: i64,
    #[serde(default)]
    lang_code: String,
    #[serde(default)]
    br_rteid: String,
    #[serde(default)]
    br_rtedir: String,
    #[serde(default)]
    sign_text: String,
    #[serde(default)]
    sign_txttp: String,
    #[serde(default)]
    tow_rteid: String,
    sign_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct TrafficRecord {
    link_id: i64,
    traffic_cd: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct LinkReferenceRecord {
    link_pvid: i64,
    travel_direction: String,
    u: i64,
    m: i64,
    t: i64,
    w: i64,
    r: i64,
    f: i64,
    s: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct TmcReferenceRecord {
    tmc: String,
    u: i64,
    m: i64,
    t: i64,
    w: i64,
    r: i64,
    f: i64,
    s: i64,
}

// ── Adapter ───────────────────────────────────────────────────────────────────

pub struct HereAdapter<S> {
    source: S,
    transport_fields: bool,
    chunk_size: usize,
    spatial_order: bool,
    /// Shared by turns and forks; dropped by [`VendorAdapter::release`].
    rdms: Option<Vec<RdmsRecord>>,
}

impl<S: RowSource> HereAdapter<S> {
    pub fn new(source: S) -> Self {
        Self { source, transport_fields: false, chunk_size: DEFAULT_CHUNK_SIZE, spatial_order: true, rdms: None }
    }

    /// Resolve truck and hazmat condition modifiers (`CndMod` tables).
    pub fn transport_fields(mut self, on: bool) -> Self {
        self.transport_fields = on;
        self
    }

    pub fn chunk_size(mut self, rows: usize) -> Self {
        self.chunk_size = rows;
        self
    }

    /// Keep `Streets` row order instead of spatial order.
    pub fn spatial_order(mut self, on: bool) -> Self {
        self.spatial_order = on;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn turn_condition_types(&self) -> Vec<i64> {
        let mut types = here::TURN_CONDITION_TYPES.to_vec();
        if self.transport_fields {
            types.push(here::TRANSPORT_CONDITION);
        }
        types
    }

    fn rdms(&mut self) -> VendorResult<&[RdmsRecord]> {
        let rows = match self.rdms.take() {
            Some(rows) => rows,
            None => self.source.read_all(tables::RDMS)?,
        };
        Ok(self.rdms.insert(rows).as_slice())
    }

    /// Explicatable alternate names per link, exact duplicates removed.
    fn alt_names(&self) -> VendorResult<FxHashMap<i64, Vec<AltStreetRecord>>> {
        let mut by_link: FxHashMap<i64, Vec<AltStreetRecord>> = FxHashMap::default();
        if !self.source.has_table(tables::ALT_STREETS) {
            return Ok(by_link);
        }
        let rows = self
            .source
            .read_rows::<AltStreetRecord, _>(tables::ALT_STREETS, |r| r.explicatbl == "Y")?;
        for r in rows {
            let names = by_link.entry(r.link_id).or_default();
            if !names.contains(&r) {
                names.push(r);
            }
        }
        Ok(by_link)
    }

    /// `(F_ZLEV, T_ZLEV)` per link: the z-level at the lowest and highest
    /// intersecting shape point.
    fn z_levels(&self) -> VendorResult<FxHashMap<i64, (i64, i64)>> {
        let mut ends: FxHashMap<i64, ((i64, i64), (i64, i64))> = FxHashMap::default();
        if !self.source.has_table(tables::Z_LEVELS) {
            return Ok(FxHashMap::default());
        }
        let rows = self
            .source
            .read_rows::<ZLevelRecord, _>(tables::Z_LEVELS, |r| r.intrsect == "Y")?;
        for r in rows {
            let point = (r.point_num, r.z_level);
            let e = ends.entry(r.link_id).or_insert((point, point));
            if r.point_num < e.0.0 {
                e.0 = point;
            }
            if r.point_num >= e.1.0 {
                e.1 = point;
            }
        }
        Ok(ends.into_iter().map(|(link, (first, last))| (link, (first.1, last.1))).collect())
    }

    fn speed_patterns(&self) -> VendorResult<Vec<SpeedPattern>> {
        let slices = SliceGranularity::Minutes15;
        let columns: Vec<String> = (0..slices.slice_count()).map(|i| slices.here_column(i)).collect();
        let rows: Vec<FxHashMap<String, f64>> = self.source.read_all(tables::SPEED_PROFILES)?;
        rows.into_iter()
            .map(|row| {
                let pattern_id = row.get("PATTERN_ID").copied().ok_or(VendorError::MissingColumn {
                    table: tables::SPEED_PROFILES,
                    column: "PATTERN_ID",
                })?;
                let speeds = columns.iter().filter_map(|c| row.get(c).copied()).collect();
                Ok(SpeedPattern { pattern_id: pattern_id as i64, speeds })
            })
            .collect()
    }

    fn traffic_refs(&self) -> VendorResult<Vec<TmcTrafficRef>> {
        Ok(self
            .source
            .read_all::<TrafficRecord>(tables::TRAFFIC)?
            .into_iter()
            .map(|r| TmcTrafficRef { link_id: r.link_id, traffic_cd: r.traffic_cd })
            .collect())
    }

    /// FC1-4 references as they are, then FC5 references without the ones
    /// that only repeat a constant pattern.
    fn link_pattern_assignments(
        &self,
        edges: &EdgeTable,
        catalog: &PatternCatalog,
    ) -> VendorResult<Vec<PatternAssignment>> {
        let mut out = Vec::new();
        for (table, minor_fc) in [(tables::LINK_REFERENCE_FC1_4, false), (tables::LINK_REFERENCE_FC5, true)] {
            let mut chunks = 0usize;
            for chunk in self.source.read_chunks::<LinkReferenceRecord>(table, self.chunk_size)? {
                let refs: Vec<LinkPatternRef> = chunk?
                    .into_iter()
                    .map(|r| LinkPatternRef {
                        link_id: r.link_pvid,
                        travel_direction: r.travel_direction,
                        days: [r.u, r.m, r.t, r.w, r.r, r.f, r.s],
                    })
                    .collect();
                out.extend(link_assignments(&refs, edges, catalog, minor_fc));
                chunks += 1;
            }
            log::debug!("{table}: {chunks} chunks read");
        }
        Ok(out)
    }

    fn tmc_pattern_assignments(&self) -> VendorResult<Vec<PatternAssignment>> {
        let traffic = self.traffic_refs()?;
        let patterns: Vec<TmcPatternRef> = self
            .source
            .read_all::<TmcReferenceRecord>(tables::TMC_REFERENCE)?
            .into_iter()
            .map(|r| TmcPatternRef { tmc: r.tmc, days: [r.u, r.m, r.t, r.w, r.r, r.f, r.s] })
            .collect();
        Ok(tmc_assignments(&traffic, &patterns))
    }
}

fn set_text(builder: &mut EdgeTableBuilder, field: &str, value: &str) {
    if !value.is_empty() {
        builder.set_last_attr(field, AttrValue::from(value));
    }
}

impl<S: RowSource> VendorAdapter for HereAdapter<S> {
    fn name(&self) -> &'static str {
        "HERE"
    }

    fn street_columns(&self) -> (&'static str, &'static str, &'static str) {
        ("LINK_ID", "REF_IN_ID", "NREF_IN_ID")
    }

    fn edge_table(&mut self, _diag: &mut dyn Diagnostics) -> VendorResult<EdgeTable> {
        log::info!("Reading HERE Streets and related tables...");
        let alt_names = self.alt_names()?;
        let z_levels = self.z_levels()?;

        let cdms = self.source.read_rows::<CdmsRecord, _>(tables::CDMS, |r| {
            r.cond_type == here::CONSTRUCTION_CONDITION || r.cond_type == here::USAGE_FEE_CONDITION
        })?;
        let mut closed: FxHashSet<i64> = FxHashSet::default();
        let mut usage_fees: FxHashMap<i64, CdmsRecord> = FxHashMap::default();
        for r in cdms {
            if r.cond_type == here::CONSTRUCTION_CONDITION {
                closed.insert(r.link_id);
            } else {
                usage_fees.entry(r.link_id).or_insert(r);
            }
        }

        let streets = self.source.read_all::<StreetRecord>(tables::STREETS)?;
        let mut builder = EdgeTableBuilder::with_capacity(streets.len()).spatial_order(self.spatial_order);
        for field in ["F_ZLEV", "T_ZLEV", "Language", "Language_Alt"] {
            builder.declare_field(field);
        }
        for field in ALT_NAME_FIELDS {
            builder.declare_field(field);
        }
        builder.declare_field("ClosedForConstruction");
        for suffix in ACCESS_SUFFIXES {
            builder.declare_field(&format!("UFR_{suffix}"));
        }

        for s in &streets {
            let geometry = Polyline::from_wkt(&s.shape).map_err(|source| VendorError::Geometry {
                table: tables::STREETS,
                street: s.link_id,
                source,
            })?;
            let meters = geometry.geodesic_length_m();
            builder.add_edge(Edge::new(
                StreetId(s.link_id),
                NodeId(s.ref_in_id),
                NodeId(s.nref_in_id),
                meters,
                kph(&s.speed_cat, &s.contracc),
                geometry,
            ));

            set_text(&mut builder, "SPEED_CAT", &s.speed_cat);
            set_text(&mut builder, "CONTRACC", &s.contracc);
            set_text(&mut builder, "ST_NAME", &s.st_name);
            set_text(&mut builder, "ST_LANGCD", &s.st_langcd);
            set_text(&mut builder, "ST_NM_PREF", &s.st_nm_pref);
            set_text(&mut builder, "ST_TYP_BEF", &s.st_typ_bef);
            set_text(&mut builder, "ST_NM_BASE", &s.st_nm_base);
            set_text(&mut builder, "ST_NM_SUFF", &s.st_nm_suff);
            set_text(&mut builder, "ST_TYP_AFT", &s.st_typ_aft);
            set_text(&mut builder, "DIRONSIGN", &s.dironsign);
            set_text(&mut builder, "Language", lang::here(&s.st_langcd));

            // Of several qualifying alternates the last one wins.
            let alt = alt_names
                .get(&s.link_id)
                .and_then(|names| names.iter().rev().find(|a| a.differs_from(s)));
            if let Some(alt) = alt {
                for (field, value) in ALT_NAME_FIELDS.into_iter().zip(alt.values()) {
                    set_text(&mut builder, field, value);
                }
                set_text(&mut builder, "Language_Alt", lang::here(&alt.st_langcd));
            }

            if let Some(&(f_zlev, t_zlev)) = z_levels.get(&s.link_id) {
                builder.set_last_attr("F_ZLEV", AttrValue::Int(f_zlev));
                builder.set_last_attr("T_ZLEV", AttrValue::Int(t_zlev));
            }
            if closed.contains(&s.link_id) {
                builder.set_last_attr("ClosedForConstruction", AttrValue::yes());
            }
            if let Some(fee) = usage_fees.get(&s.link_id) {
                for (suffix, value) in fee.access() {
                    set_text(&mut builder, &format!("UFR_{suffix}"), value);
                }
            }
        }

        let table = builder.build()?;
        log::info!("{} HERE streets prepared", table.len());
        Ok(table)
    }

    fn restriction_table(&mut self, _diag: &mut dyn Diagnostics) -> VendorResult<RestrictionTable> {
        let mut out = RestrictionTable::default();
        for suffix in ACCESS_SUFFIXES {
            out.set.declare_turn_field(&format!("AR_{suffix}"));
        }

        let turn_types = self.turn_condition_types();
        let cdms = self.source.read_rows::<CdmsRecord, _>(tables::CDMS, |r| {
            turn_types.contains(&r.cond_type) || here::STREET_CONDITION_TYPES.contains(&r.cond_type)
        })?;

        // Street conditions span several links; turn conditions take their
        // access flags from the first row.
        let mut street_links: FxHashMap<i64, Vec<StreetId>> = FxHashMap::default();
        let mut turn_conditions: FxHashSet<i64> = FxHashSet::default();
        for r in &cdms {
            if here::STREET_CONDITION_TYPES.contains(&r.cond_type) {
                street_links.entry(r.cond_id).or_default().push(StreetId(r.link_id));
                continue;
            }
            if !turn_conditions.insert(r.cond_id) {
                continue;
            }
            let condition = ConditionId(r.cond_id);
            for (suffix, value) in r.access() {
                if !value.is_empty() {
                    out.set.push(RestrictionRecord::turn(condition, &format!("AR_{suffix}"), AttrValue::from(value)));
                }
            }
            if r.cond_type == here::TRANSPORT_CONDITION {
                out.transport_conditions.insert(condition);
            }
        }

        if !self.transport_fields {
            return Ok(out);
        }

        log::info!("Reading and processing transport condition modifier (CndMod) tables...");
        let directional = here::PREFERRED_FIELDS
            .iter()
            .chain(&here::PROHIBITED_FIELDS)
            .chain(&here::LIMIT_FIELDS)
            .chain(&here::VEHICLE_FIELDS)
            .chain([&here::TRUCK_SPEED_FIELD]);
        for field in directional {
            out.set.declare_street_field(field);
        }
        out.set.declare_plain_street_field(here::TRUCK_FC_OVERRIDE_FIELD);
        for field in here::PROHIBITED_FIELDS.iter().chain(&here::LIMIT_FIELDS).chain(&here::VEHICLE_FIELDS) {
            out.set.declare_turn_field(field);
        }

        for (table, units) in [(tables::CNDMOD_US, UnitSystem::Us), (tables::CNDMOD_NON_US, UnitSystem::Metric)] {
            if !self.source.has_table(table) {
                continue;
            }
            let rows = self
                .source
                .read_rows::<CndModRecord, _>(table, |r| here::MODIFIER_TYPES.contains(&r.mod_type))?;
            for m in rows {
                let condition = ConditionId(m.cond_id);
                let value = m.mod_val.trim();
                if let Some((category, direction)) = here::indicator(m.mod_type, value) {
                    out.set.indicators.push(DirectionIndicator { condition, category, direction });
                    continue;
                }
                if let Some(links) = street_links.get(&m.cond_id) {
                    if let Some(effect) = here::street_effect(m.mod_type, value, units) {
                        let direction = match effect.category {
                            Some(category) => DirectionSource::Lookup(condition, category),
                            None => DirectionSource::Undirected,
                        };
                        for &link in links {
                            out.set.push(RestrictionRecord::street(link, effect.field, effect.value.clone(), direction));
                        }
                    }
                }
                if turn_conditions.contains(&m.cond_id) {
                    if let Some((field, value)) = here::turn_effect(m.mod_type, value, units) {
                        out.set.push(RestrictionRecord::turn(condition, field, value));
                    }
                }
            }
        }
        out.derived.push(PREFERRED_TRUCK_ROUTE);

        log::debug!(
            "HERE restrictions: {} records, {} direction indicators, {} transport conditions",
            out.set.len(),
            out.set.indicators.len(),
            out.transport_conditions.len()
        );
        Ok(out)
    }

    fn maneuver_table(&mut self, diag: &mut dyn Diagnostics) -> VendorResult<ManeuverTable> {
        let turn_types = self.turn_condition_types();
        let mut conditions: FxHashMap<i64, (i64, Edge1End)> = FxHashMap::default();
        for r in self
            .source
            .read_rows::<CdmsRecord, _>(tables::CDMS, |r| turn_types.contains(&r.cond_type))?
        {
            // END_OF_LK names the node the maneuver leaves the first link by.
            let edge1_end = match r.end_of_lk.trim() {
                "N" => Edge1End::Yes,
                "R" => Edge1End::No,
                _ => Edge1End::Unknown,
            };
            conditions.entry(r.cond_id).or_insert((r.cond_type, edge1_end));
        }

        let rdms = self.rdms()?;
        let mut groups: BTreeMap<(i64, i64), Vec<&RdmsRecord>> = BTreeMap::new();
        for r in rdms.iter().filter(|r| conditions.contains_key(&r.cond_id)) {
            groups.entry((r.cond_id, r.link_id)).or_default().push(r);
        }
        let max_seq = groups.values().flatten().map(|r| r.seq_number).max().unwrap_or(0);

        let mut records = Vec::with_capacity(groups.len());
        for ((cond_id, link_id), mut rows) in groups {
            rows.sort_by_key(|r| r.seq_number);
            if rows.windows(2).any(|w| w[0].seq_number == w[1].seq_number) {
                diag.warning(format!(
                    "Duplicate SEQ_NUMBER values detected for the turn feature described by LINK_ID {link_id} and \
                     COND_ID {cond_id}. This likely indicates an input data error and may result in an invalid \
                     output turn feature."
                ));
            }
            let Some(&(cond_type, edge1_end)) = conditions.get(&cond_id) else {
                continue;
            };
            let streets = std::iter::once(StreetId(link_id))
                .chain(rows.iter().map(|r| StreetId(r.man_linkid)))
                .collect();
            records.push(ManeuverRecord {
                id: cond_id,
                cond_type: Some(cond_type),
                streets,
                start: StartHint::Flag(edge1_end),
            });
        }

        Ok(ManeuverTable {
            records,
            max_edges: (max_seq + 1).max(2) as usize,
            id_column: "COND_ID",
            with_cond_type: true,
        })
    }

    fn fork_table(&mut self, _diag: &mut dyn Diagnostics) -> VendorResult<Vec<ForkRecord>> {
        let conditions: FxHashSet<i64> = self
            .source
            .read_rows::<CdmsRecord, _>(tables::CDMS, |r| r.cond_type == here::FORK_CONDITION)?
            .into_iter()
            .map(|r| r.cond_id)
            .collect();

        let rdms = self.rdms()?;
        let mut groups: BTreeMap<i64, Vec<&RdmsRecord>> = BTreeMap::new();
        for r in rdms.iter().filter(|r| conditions.contains(&r.cond_id)) {
            groups.entry(r.link_id).or_default().push(r);
        }

        // The entry link carries sequence 0, its maneuver links 1, 2, 3.
        Ok(groups
            .into_iter()
            .map(|(link_id, mut rows)| {
                rows.sort_by_key(|r| r.seq_number);
                let path = std::iter::once(PathStep::new(link_id, 0))
                    .chain(rows.iter().map(|r| PathStep::new(r.man_linkid, r.seq_number)))
                    .collect();
                ForkRecord { id: link_id, path, first_seq: 0, orientation: ForkOrientation::SharedNodes }
            })
            .collect())
    }

    fn signpost_table(&mut self, _diag: &mut dyn Diagnostics) -> VendorResult<Vec<SignpostRecord>> {
        let mut groups: BTreeMap<(i64, i64), Vec<SignRecord>> = BTreeMap::new();
        for r in self.source.read_all::<SignRecord>(tables::SIGNS)? {
            groups.entry((r.src_linkid, r.dst_linkid)).or_default().push(r);
        }

        let mut records = Vec::with_capacity(groups.len());
        for ((src, dst), mut rows) in groups {
            rows.sort_by_key(|r| r.seq_num);
            let mut exit_name = String::new();
            let mut branches = Vec::new();
            let mut towards = Vec::new();
            for r in &rows {
                exit_name.clone_from(&r.exit_num);
                let lang = lang::here(&r.lang_code).to_string();
                let dir = Some(r.br_rtedir.clone()).filter(|d| !d.is_empty());
                let branch = |text: &str| BranchText { text: text.to_string(), dir: dir.clone(), lang: lang.clone() };
                let toward = |text: &str| SignText { text: text.to_string(), lang: lang.clone() };

                if !r.br_rteid.is_empty() {
                    branches.push(branch(&r.br_rteid));
                }
                if !r.sign_text.is_empty() {
                    match r.sign_txttp.as_str() {
                        "B" => branches.push(branch(&r.sign_text)),
                        "T" => towards.push(toward(&r.sign_text)),
                        _ => {}
                    }
                }
                if !r.tow_rteid.is_empty() {
                    towards.push(toward(&r.tow_rteid));
                }
            }
            records.push(SignpostRecord {
                source_id: rows.first().map_or(0, |r| r.sign_id),
                path: SignPath::Pair { src: StreetId(src), dst: StreetId(dst) },
                exit_name,
                branches,
                towards,
            });
        }
        log::debug!("HERE signs: {} signposts", records.len());
        Ok(records)
    }

    fn traffic_table(
        &mut self,
        edges: &EdgeTable,
        mode: HistoricalTraffic,
        fcid: i64,
        diag: &mut dyn Diagnostics,
    ) -> VendorResult<Option<TrafficTable>> {
        let with_tmc = match mode {
            HistoricalTraffic::None => return Ok(None),
            HistoricalTraffic::LinkReference => false,
            HistoricalTraffic::Tmc => true,
            HistoricalTraffic::Enabled => {
                return Err(VendorError::Unsupported(
                    "HERE historical traffic needs link reference or TMC reference files".to_string(),
                ));
            }
        };

        log::info!("Populating the Patterns table...");
        let (profiles, catalog) = build_patterns(&self.speed_patterns()?, diag)?;

        let assignments = if with_tmc {
            log::info!("Populating Streets_Patterns table from TMC traffic tables...");
            self.tmc_pattern_assignments()?
        } else {
            log::info!("Populating Streets_Patterns table from link reference tables...");
            self.link_pattern_assignments(edges, &catalog)?
        };
        let streets = merge_patterns(&assignments, &catalog, edges, fcid, diag);
        Ok(Some(TrafficTable::Patterns { profiles, streets, with_tmc }))
    }

    fn tmc_table(&mut self, edges: &EdgeTable, fcid: i64, diag: &mut dyn Diagnostics) -> VendorResult<Vec<StreetTmcRow>> {
        Ok(here_tmc_rows(&self.traffic_refs()?, edges, fcid, diag))
    }

    fn release(&mut self) {
        self.rdms = None;
    }
}
