//! TomTom MultiNet adapter.
//!
//! MultiNet stores its 64-bit ids as doubles; every id column is read through
//! [`float_id`].  Edges keep the vendor digitization: `F_JNCTID` is the from
//! node and `T_JNCTID` the to node.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use sdp_core::{ConditionId, Diagnostics, NodeId, Polyline, StreetId};
use sdp_maneuver::{ForkOrientation, ForkRecord, ManeuverRecord, PathStep, SignPath, SignpostRecord, StartHint};
use sdp_network::{AttrValue, Edge, EdgeTable, EdgeTableBuilder};
use sdp_output::{BranchText, SignText, StreetTmcRow};
use sdp_restrict::vocab::multinet;
use sdp_restrict::{DirectionSource, RestrictionRecord};
use sdp_traffic::{DailySpeedRecord, RdsTmcRecord, SlotSample, daily_profile_rows, daily_profiles, multinet_tmc_rows};

use crate::adapter::{HistoricalTraffic, ManeuverTable, RestrictionTable, TrafficTable, VendorAdapter};
use crate::source::{RowSource, float_id, opt_float_id};
use crate::{VendorError, VendorResult, lang};

pub mod tables {
    /// Network (streets).
    pub const NW: &str = "nw";
    /// Maneuvers.
    pub const MN: &str = "mn";
    /// Maneuver path index.
    pub const MP: &str = "mp";
    /// Restrictions.
    pub const RS: &str = "rs";
    /// Signpost path index.
    pub const SP: &str = "sp";
    /// Signpost information.
    pub const SI: &str = "si";
    /// Logistics truck routes.
    pub const LTR: &str = "ltr";
    /// Logistics restrictions.
    pub const LRS: &str = "lrs";
    /// Logistics vehicle caveats.
    pub const LVC: &str = "lvc";
    /// Network profile links (historical speeds).
    pub const HSNP: &str = "hsnp";
    /// Speed profiles.
    pub const HSPR: &str = "hspr";
    /// RDS-TMC information.
    pub const RD: &str = "rd";
}

/// Address area boundary elements; not routable.
const EXCLUDED_FEATURE_TYPE: i64 = 4165;

/// `TOLLRDDIR` for a `TOLLRD` code.
pub fn toll_direction(tollrd: i64) -> &'static str {
    match tollrd {
        11 | 21 => "B",
        12 | 22 => "FT",
        13 | 23 => "TF",
        _ => "",
    }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct NetworkRecord {
    #[serde(deserialize_with = "float_id")]
    id: i64,
    feattyp: i64,
    #[serde(deserialize_with = "float_id")]
    f_jnctid: i64,
    #[serde(deserialize_with = "float_id")]
    t_jnctid: i64,
    meters: f64,
    kph: f64,
    #[serde(default)]
    tollrd: Option<i64>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    fow: Option<i64>,
    #[serde(default)]
    freeway: Option<i64>,
    #[serde(default)]
    oneway: String,
    #[serde(default)]
    f_elev: Option<i64>,
    #[serde(default)]
    t_elev: Option<i64>,
    shape: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct ManeuverRow {
    #[serde(deserialize_with = "float_id")]
    id: i64,
    feattyp: i64,
    #[serde(deserialize_with = "float_id")]
    jnctid: i64,
}

/// One row of `mp` or `sp`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct PathRow {
    #[serde(deserialize_with = "float_id")]
    id: i64,
    #[serde(deserialize_with = "float_id")]
    trpelid: i64,
    seqnr: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RestrictionRow {
    #[serde(deserialize_with = "float_id")]
    id: i64,
    feattyp: i64,
    vt: i64,
    #[serde(default)]
    dir_pos: Option<i64>,
    #[serde(default)]
    restrtyp: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct SignInfoRow {
    #[serde(deserialize_with = "float_id")]
    id: i64,
    #[serde(default)]
    infotyp: String,
    #[serde(default)]
    txtcont: String,
    #[serde(default)]
    txtcontlc: String,
    #[serde(default)]
    contyp: Option<i64>,
    seqnr: i64,
    #[serde(default)]
    destseq: i64,
    #[serde(default)]
    rnpart: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct TruckRouteRow {
    #[serde(deserialize_with = "float_id")]
    id: i64,
    #[serde(default)]
    preferred: Option<i64>,
    #[serde(default)]
    restricted: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct LogisticsRow {
    #[serde(deserialize_with = "float_id")]
    id: i64,
    seqnr: i64,
    restrtyp: String,
    vt: i64,
    #[serde(default)]
    restrval: i64,
    #[serde(default)]
    limit: f64,
    #[serde(default)]
    unit_meas: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct CaveatRow {
    #[serde(deserialize_with = "float_id")]
    id: i64,
    seqnr: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct ProfileSlotRow {
    profile_id: i64,
    time_slot: u32,
    rel_sp: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct NetworkProfileRow {
    #[serde(deserialize_with = "float_id")]
    network_id: i64,
    val_dir: i64,
    #[serde(default)]
    spfreeflow: f64,
    #[serde(default)]
    spweekday: f64,
    #[serde(default)]
    spweekend: f64,
    #[serde(default)]
    spweek: f64,
    #[serde(default, deserialize_with = "opt_float_id")]
    profile_1: Option<i64>,
    #[serde(default, deserialize_with = "opt_float_id")]
    profile_2: Option<i64>,
    #[serde(default, deserialize_with = "opt_float_id")]
    profile_3: Option<i64>,
    #[serde(default, deserialize_with = "opt_float_id")]
    profile_4: Option<i64>,
    #[serde(default, deserialize_with = "opt_float_id")]
    profile_5: Option<i64>,
    #[serde(default, deserialize_with = "opt_float_id")]
    profile_6: Option<i64>,
    #[serde(default, deserialize_with = "opt_float_id")]
    profile_7: Option<i64>,
}

impl From<NetworkProfileRow> for DailySpeedRecord {
    fn from(r: NetworkProfileRow) -> Self {
        let profiles = [r.profile_1, r.profile_2, r.profile_3, r.profile_4, r.profile_5, r.profile_6, r.profile_7]
            .map(|p| p.unwrap_or(0));
        DailySpeedRecord {
            network_id: r.network_id,
            val_dir: r.val_dir,
            sp_free_flow: r.spfreeflow,
            sp_weekday: r.spweekday,
            sp_weekend: r.spweekend,
            sp_week: r.spweek,
            profiles,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RdsTmcRow {
    #[serde(deserialize_with = "float_id")]
    id: i64,
    #[serde(default)]
    rdstmc: String,
}

// ── Adapter ───────────────────────────────────────────────────────────────────

pub struct MultiNetAdapter<S> {
    source: S,
    logistics: bool,
    spatial_order: bool,
    /// `mn` rows, shared by turns and forks.
    maneuvers: Option<Vec<ManeuverRow>>,
    /// `mp` rows grouped by maneuver id, sorted by `SEQNR`.
    paths: Option<FxHashMap<i64, Vec<PathStep>>>,
}

impl<S: RowSource> MultiNetAdapter<S> {
    pub fn new(source: S) -> Self {
        Self { source, logistics: false, spatial_order: true, maneuvers: None, paths: None }
    }

    /// Read the `lrs` / `lvc` logistics restriction tables.
    pub fn logistics(mut self, on: bool) -> Self {
        self.logistics = on;
        self
    }

    /// Keep `nw` row order instead of spatial order.
    pub fn spatial_order(mut self, on: bool) -> Self {
        self.spatial_order = on;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn load_maneuvers(&mut self) -> VendorResult<()> {
        if self.maneuvers.is_none() {
            self.maneuvers = Some(self.source.read_all(tables::MN)?);
        }
        if self.paths.is_none() {
            let mut paths: FxHashMap<i64, Vec<PathStep>> = FxHashMap::default();
            for r in self.source.read_all::<PathRow>(tables::MP)? {
                paths.entry(r.id).or_default().push(PathStep::new(r.trpelid, r.seqnr));
            }
            for steps in paths.values_mut() {
                steps.sort_by_key(|s| s.seq);
            }
            self.paths = Some(paths);
        }
        Ok(())
    }

    /// `(ID, JNCTID, path)` for every `mn` row of the given types.
    fn maneuvers_of(&self, types: &[i64]) -> Vec<(i64, NodeId, Option<&Vec<PathStep>>)> {
        let (Some(maneuvers), Some(paths)) = (&self.maneuvers, &self.paths) else {
            return Vec::new();
        };
        maneuvers
            .iter()
            .filter(|m| types.contains(&m.feattyp))
            .map(|m| (m.id, NodeId(m.jnctid), paths.get(&m.id)))
            .collect()
    }

    fn restrictions(&self) -> VendorResult<Vec<RestrictionRow>> {
        self.source
            .read_rows(tables::RS, |r: &RestrictionRow| multinet::VEHICLE_TYPES.contains(&r.vt))
    }

    /// Logistics truck route flags, undirected.
    fn truck_routes(&self, out: &mut RestrictionTable) -> VendorResult<()> {
        if !self.source.has_table(tables::LTR) {
            return Ok(());
        }
        for field in multinet::LTR_FIELDS {
            out.set.declare_plain_street_field(field);
        }
        for r in self.source.read_all::<TruckRouteRow>(tables::LTR)? {
            let fields = [
                r.preferred.and_then(multinet::ltr_preferred),
                r.restricted.and_then(multinet::ltr_restricted),
            ];
            for field in fields.into_iter().flatten() {
                out.set.push(RestrictionRecord::street(
                    StreetId(r.id),
                    field,
                    AttrValue::yes(),
                    DirectionSource::Undirected,
                ));
            }
        }
        Ok(())
    }

    /// Logistics restrictions without vehicle caveats, undirected.
    fn logistics_restrictions(&self, out: &mut RestrictionTable, diag: &mut dyn Diagnostics) -> VendorResult<()> {
        log::info!("Reading MultiNet Logistics tables...");
        let caveats: FxHashSet<(i64, i64)> = if self.source.has_table(tables::LVC) {
            self.source
                .read_all::<CaveatRow>(tables::LVC)?
                .into_iter()
                .map(|r| (r.id, r.seqnr))
                .collect()
        } else {
            FxHashSet::default()
        };

        let rows = self
            .source
            .read_rows(tables::LRS, |r: &LogisticsRow| !caveats.contains(&(r.id, r.seqnr)))?;
        let mut unsupported = 0usize;
        let mut fields: BTreeSet<String> = BTreeSet::new();
        for r in &rows {
            let Some(value) = multinet::lrs_value(r.restrtyp.trim(), r.unit_meas, r.limit) else {
                unsupported += 1;
                continue;
            };
            let field = multinet::lrs_field(r.restrtyp.trim(), r.vt, r.restrval);
            out.set.push(RestrictionRecord::street(StreetId(r.id), &field, value, DirectionSource::Undirected));
            fields.insert(field);
        }
        for field in &fields {
            out.set.declare_plain_street_field(field);
        }
        if unsupported > 0 {
            diag.warning(format!(
                "{unsupported} records from the MultiNet Logistics LRS table had unsupported RESTRTYP or UNIT_MEAS \
                 field values. These records have been ignored."
            ));
        }
        log::info!("{} MultiNet Logistics restrictions will be included in the network.", fields.len());
        Ok(())
    }
}

fn set_text(builder: &mut EdgeTableBuilder, field: &str, value: &str) {
    if !value.is_empty() {
        builder.set_last_attr(field, AttrValue::from(value));
    }
}

fn set_int(builder: &mut EdgeTableBuilder, field: &str, value: Option<i64>) {
    if let Some(v) = value {
        builder.set_last_attr(field, AttrValue::Int(v));
    }
}

impl<S: RowSource> VendorAdapter for MultiNetAdapter<S> {
    fn name(&self) -> &'static str {
        "MultiNet"
    }

    fn street_columns(&self) -> (&'static str, &'static str, &'static str) {
        ("ID", "F_JNCTID", "T_JNCTID")
    }

    fn edge_table(&mut self, _diag: &mut dyn Diagnostics) -> VendorResult<EdgeTable> {
        log::info!("Reading MultiNet network table...");
        let rows = self
            .source
            .read_rows(tables::NW, |r: &NetworkRecord| r.feattyp != EXCLUDED_FEATURE_TYPE)?;
        let mut builder = EdgeTableBuilder::with_capacity(rows.len()).spatial_order(self.spatial_order);
        builder.declare_field("TOLLRDDIR");

        for r in &rows {
            let geometry = Polyline::from_wkt(&r.shape).map_err(|source| VendorError::Geometry {
                table: tables::NW,
                street: r.id,
                source,
            })?;
            builder.add_edge(Edge::new(
                StreetId(r.id),
                NodeId(r.f_jnctid),
                NodeId(r.t_jnctid),
                r.meters,
                r.kph,
                geometry,
            ));
            set_text(&mut builder, "NAME", &r.name);
            set_int(&mut builder, "FOW", r.fow);
            set_int(&mut builder, "FREEWAY", r.freeway);
            set_text(&mut builder, "ONEWAY", &r.oneway);
            set_int(&mut builder, "F_ELEV", r.f_elev);
            set_int(&mut builder, "T_ELEV", r.t_elev);
            set_int(&mut builder, "TOLLRD", r.tollrd);
            set_text(&mut builder, "TOLLRDDIR", toll_direction(r.tollrd.unwrap_or(0)));
        }

        let table = builder.build()?;
        log::info!("{} MultiNet streets prepared", table.len());
        Ok(table)
    }

    fn restriction_table(&mut self, diag: &mut dyn Diagnostics) -> VendorResult<RestrictionTable> {
        log::info!("Reading and grouping restrictions table...");
        let mut out = RestrictionTable::default();
        for field in multinet::VEHICLE_FIELDS {
            out.set.declare_street_field(field);
            out.set.declare_turn_field(field);
        }

        for r in self.restrictions()? {
            let Some(field) = multinet::vehicle_field(r.vt) else {
                continue;
            };
            let restrtyp = r.restrtyp.trim();
            if multinet::TURN_FEATURE_TYPES.contains(&r.feattyp) {
                let condition = ConditionId(r.id);
                out.set.push(RestrictionRecord::turn(condition, field, AttrValue::yes()));
                if restrtyp == multinet::ALL_VEHICLES_TURN {
                    out.set.push(RestrictionRecord::turn(condition, multinet::VEHICLE_FIELDS[0], AttrValue::yes()));
                }
            } else if restrtyp == multinet::DIRECTIONAL_FLOW {
                let Some(direction) = r.dir_pos.and_then(multinet::dir_pos) else {
                    continue;
                };
                out.set.push(RestrictionRecord::street(
                    StreetId(r.id),
                    field,
                    AttrValue::yes(),
                    DirectionSource::Explicit(direction),
                ));
            }
        }

        self.truck_routes(&mut out)?;
        if self.logistics {
            self.logistics_restrictions(&mut out, diag)?;
        }
        log::debug!("MultiNet restrictions: {} records", out.set.len());
        Ok(out)
    }

    fn maneuver_table(&mut self, _diag: &mut dyn Diagnostics) -> VendorResult<ManeuverTable> {
        self.load_maneuvers()?;
        let max_seq = self
            .paths
            .as_ref()
            .and_then(|p| p.values().flatten().map(|s| s.seq).max())
            .unwrap_or(0);

        // A maneuver without path rows still yields a record so the turn
        // builder reports it.
        let records = self
            .maneuvers_of(&multinet::TURN_FEATURE_TYPES)
            .into_iter()
            .map(|(id, junction, path)| ManeuverRecord {
                id,
                cond_type: None,
                streets: path.map(|p| p.iter().map(|s| s.street).collect()).unwrap_or_default(),
                start: StartHint::Junction(junction),
            })
            .collect();

        Ok(ManeuverTable { records, max_edges: max_seq.max(2) as usize, id_column: "ID", with_cond_type: false })
    }

    fn fork_table(&mut self, diag: &mut dyn Diagnostics) -> VendorResult<Vec<ForkRecord>> {
        self.load_maneuvers()?;
        let mut records = Vec::new();
        for (id, junction, path) in self.maneuvers_of(&[multinet::FORK_FEATURE_TYPE]) {
            let Some(path) = path else {
                diag.warning(format!(
                    "There were no records in the maneuver path table for ID {id}, which appears in the maneuver \
                     geometry table."
                ));
                continue;
            };
            records.push(ForkRecord {
                id,
                path: path.clone(),
                first_seq: 1,
                orientation: ForkOrientation::Junction(junction),
            });
        }
        Ok(records)
    }

    fn signpost_table(&mut self, diag: &mut dyn Diagnostics) -> VendorResult<Vec<SignpostRecord>> {
        log::info!("Reading signpost tables...");
        let mut paths: BTreeMap<i64, Vec<PathStep>> = BTreeMap::new();
        for r in self.source.read_all::<PathRow>(tables::SP)? {
            paths.entry(r.id).or_default().push(PathStep::new(r.trpelid, r.seqnr));
        }
        let mut info: FxHashMap<i64, Vec<SignInfoRow>> = FxHashMap::default();
        for r in self.source.read_all::<SignInfoRow>(tables::SI)? {
            info.entry(r.id).or_default().push(r);
        }

        let mut records = Vec::with_capacity(paths.len());
        for (id, mut steps) in paths {
            let Some(mut texts) = info.remove(&id) else {
                diag.warning(format!(
                    "There were no records in the sign info table for ID {id}, which appears in the sign path table."
                ));
                continue;
            };
            steps.sort_by_key(|s| s.seq);
            texts.sort_by_key(|t| (t.seqnr, t.destseq, t.rnpart));

            let mut exit_name = String::new();
            let mut branches = Vec::new();
            let mut towards = Vec::new();
            for t in texts {
                let lang = lang::multinet(&t.txtcontlc).to_string();
                match t.infotyp.trim() {
                    "4E" => exit_name = t.txtcont,
                    "9D" | "4I" => towards.push(SignText { text: t.txtcont, lang }),
                    "6T" | "RN" if t.contyp == Some(2) => towards.push(SignText { text: t.txtcont, lang }),
                    "6T" | "RN" => branches.push(BranchText { text: t.txtcont, dir: None, lang }),
                    _ => {}
                }
            }
            records.push(SignpostRecord { source_id: id, path: SignPath::Sequence(steps), exit_name, branches, towards });
        }
        log::debug!("MultiNet signs: {} signposts", records.len());
        Ok(records)
    }

    fn traffic_table(
        &mut self,
        edges: &EdgeTable,
        mode: HistoricalTraffic,
        fcid: i64,
        diag: &mut dyn Diagnostics,
    ) -> VendorResult<Option<TrafficTable>> {
        match mode {
            HistoricalTraffic::None => return Ok(None),
            HistoricalTraffic::Enabled => {}
            other => {
                return Err(VendorError::Unsupported(format!(
                    "MultiNet historical traffic is read from hsnp/hspr; {other:?} is a HERE mode"
                )));
            }
        }

        log::info!("Populating the DailyProfiles table...");
        let samples: Vec<SlotSample> = self
            .source
            .read_all::<ProfileSlotRow>(tables::HSPR)?
            .into_iter()
            .map(|r| SlotSample { profile_id: r.profile_id, time_slot: r.time_slot, rel_sp: r.rel_sp })
            .collect();
        let profiles = daily_profiles(&samples, diag);

        log::info!("Populating the Streets_DailyProfiles table...");
        let speeds: Vec<DailySpeedRecord> = self
            .source
            .read_rows(tables::HSNP, |r: &NetworkProfileRow| matches!(r.val_dir, 2 | 3))?
            .into_iter()
            .map(DailySpeedRecord::from)
            .collect();
        let streets = daily_profile_rows(&speeds, edges, fcid, diag);
        Ok(Some(TrafficTable::Daily { profiles, streets, speeds }))
    }

    fn tmc_table(&mut self, edges: &EdgeTable, fcid: i64, diag: &mut dyn Diagnostics) -> VendorResult<Vec<StreetTmcRow>> {
        if !self.source.has_table(tables::RD) {
            return Ok(Vec::new());
        }
        let records: Vec<RdsTmcRecord> = self
            .source
            .read_all::<RdsTmcRow>(tables::RD)?
            .into_iter()
            .map(|r| RdsTmcRecord { id: r.id, rdstmc: r.rdstmc })
            .collect();
        Ok(multinet_tmc_rows(&records, edges, fcid, diag))
    }

    fn release(&mut self) {
        self.maneuvers = None;
        self.paths = None;
    }
}
