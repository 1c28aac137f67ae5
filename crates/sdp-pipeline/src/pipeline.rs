//! The `Pipeline` struct and its stage sequence.

use sdp_core::Diagnostics;
use sdp_maneuver::{ForkResolver, SignpostBuilder, TurnBuilder, turn_layout};
use sdp_network::GeometryCache;
use sdp_output::{
    DailyProfileRow, ForkRow, OutputWriter, ProfileLayout, Record, SignpostRow, SignpostStreetRow, StreetLayout,
    StreetPatternLayout, StreetRow, TableBatch, TimeZoneRow, TmcLayout, write_table,
};
use sdp_restrict::{apply_derived, resolve_streets, resolve_turns};
use sdp_traffic::{
    HERE_SPEED_FIELDS, MULTINET_SPEED_FIELDS, apply_daily_speeds, apply_minutes, apply_pattern_speeds,
    apply_plain_minutes,
};
use sdp_vendor::{TrafficTable, VendorAdapter};

use crate::context::{Checkpoint, PipelineContext, held, held_mut};
use crate::{PipelineConfig, PipelineError, PipelineObserver, PipelineResult, Stage, TimeZone};

/// Rows written per output table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub streets: usize,
    /// Patterns (HERE) or DailyProfiles (MultiNet).
    pub profiles: usize,
    /// Streets_Patterns or Streets_DailyProfiles.
    pub street_profiles: usize,
    pub turns: usize,
    pub forks: usize,
    pub signposts: usize,
    pub signpost_streets: usize,
    pub tmc: usize,
    pub time_zones: usize,
    /// Recoverable problems reported during the run.
    pub warnings: usize,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// One preparation run: a vendor adapter feeding an output writer.
///
/// Stages run in a fixed order:
///
/// 1. **Streets**: edge table, street restrictions, derived flags, speeds
///    and travel times.
/// 2. **Traffic**: Patterns / DailyProfiles and their street tables.
/// 3. **Turns**: RestrictedTurns.
/// 4. **Forks**: Streets_RoadSplits.
/// 5. **Signposts**: Signposts and Signposts_Streets in one insert.
/// 6. **Live traffic**: Streets_TMC.
/// 7. **Time zones**: TimeZones.
///
/// Create via [`PipelineBuilder`][crate::PipelineBuilder].
pub struct Pipeline<W: OutputWriter> {
    pub config: PipelineConfig,
    pub(crate) adapter: Box<dyn VendorAdapter>,
    pub(crate) writer: W,
    pub(crate) context: PipelineContext,
    pub(crate) finished: bool,
}

impl<W: OutputWriter> Pipeline<W> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run every stage and finish the writer.
    ///
    /// Recoverable data problems go to `diag`; the first fatal one is
    /// reported through [`Diagnostics::error`] and aborts the run.  A
    /// pipeline runs once.
    pub fn run<O: PipelineObserver>(
        &mut self,
        observer: &mut O,
        diag: &mut dyn Diagnostics,
    ) -> PipelineResult<RunSummary> {
        if self.finished {
            return Err(PipelineError::Config("pipeline has already run".to_string()));
        }
        self.finished = true;
        self.run_stages(observer, diag).inspect_err(|e| diag.error(e.to_string()))
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consume the pipeline, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Checkpoints passed so far, in order.
    pub fn released(&self) -> &[Checkpoint] {
        self.context.released()
    }

    // ── Stages ────────────────────────────────────────────────────────────

    fn run_stages<O: PipelineObserver>(
        &mut self,
        observer: &mut O,
        diag: &mut dyn Diagnostics,
    ) -> PipelineResult<RunSummary> {
        let warnings_before = diag.warning_count();
        let mut summary = RunSummary::default();
        log::info!("Preparing {} street data", self.adapter.name());

        observer.on_stage_start(Stage::Streets);
        summary.streets = self.streets(observer, diag)?;
        observer.on_stage_end(Stage::Streets, summary.streets);

        observer.on_stage_start(Stage::Traffic);
        (summary.profiles, summary.street_profiles) = self.traffic_tables()?;
        self.checkpoint(Checkpoint::TrafficFrames, observer);
        observer.on_stage_end(Stage::Traffic, summary.street_profiles);

        observer.on_stage_start(Stage::Turns);
        summary.turns = self.turns(diag)?;
        self.checkpoint(Checkpoint::TurnRestrictions, observer);
        observer.on_stage_end(Stage::Turns, summary.turns);

        observer.on_stage_start(Stage::Forks);
        summary.forks = self.forks(diag)?;
        self.checkpoint(Checkpoint::ManeuverPaths, observer);
        observer.on_stage_end(Stage::Forks, summary.forks);

        observer.on_stage_start(Stage::Signposts);
        (summary.signposts, summary.signpost_streets) = self.signposts(diag)?;
        self.checkpoint(Checkpoint::Geometry, observer);
        observer.on_stage_end(Stage::Signposts, summary.signposts);

        if self.config.live_traffic {
            observer.on_stage_start(Stage::LiveTraffic);
            summary.tmc = self.live_traffic(diag)?;
            observer.on_stage_end(Stage::LiveTraffic, summary.tmc);
        }
        self.checkpoint(Checkpoint::Edges, observer);

        if let TimeZone::Single(name) = &self.config.time_zone {
            observer.on_stage_start(Stage::TimeZones);
            summary.time_zones = write_table(&mut self.writer, &(), &[TimeZoneRow { name: name.clone() }])?;
            observer.on_stage_end(Stage::TimeZones, summary.time_zones);
        }

        self.writer.finish()?;
        summary.warnings = diag.warning_count().saturating_sub(warnings_before);
        log::info!(
            "Finished: {} streets, {} turns, {} forks, {} signposts, {} warnings",
            summary.streets,
            summary.turns,
            summary.forks,
            summary.signposts,
            summary.warnings
        );
        observer.on_run_end(&summary);
        Ok(summary)
    }

    fn checkpoint<O: PipelineObserver>(&mut self, checkpoint: Checkpoint, observer: &mut O) {
        if checkpoint == Checkpoint::ManeuverPaths {
            self.adapter.release();
        }
        self.context.release(checkpoint);
        observer.on_checkpoint(checkpoint);
    }

    fn streets<O: PipelineObserver>(&mut self, observer: &mut O, diag: &mut dyn Diagnostics) -> PipelineResult<usize> {
        log::info!("Populating streets table...");
        let fcid = self.config.edge_fc_id;
        let mut edges = self.adapter.edge_table(diag)?;
        if edges.duplicates_removed() > 0 {
            log::info!("{} duplicate edges removed", edges.duplicates_removed());
        }

        let restrictions = self.adapter.restriction_table(diag)?;
        resolve_streets(&mut edges, &restrictions.set, diag);
        for rule in &restrictions.derived {
            let n = apply_derived(&mut edges, rule);
            log::debug!("{}: set on {n} edge directions", rule.field);
        }
        self.context.turn_restrictions = Some(resolve_turns(&restrictions.set, &restrictions.transport_conditions));
        self.context.restrictions = Some(restrictions);
        self.checkpoint(Checkpoint::RestrictionRows, observer);

        let traffic = self.adapter.traffic_table(&edges, self.config.historical_traffic, fcid, diag)?;
        match &traffic {
            Some(TrafficTable::Patterns { streets, .. }) => {
                apply_pattern_speeds(&mut edges, streets);
                apply_minutes(&mut edges, HERE_SPEED_FIELDS);
            }
            Some(TrafficTable::Daily { speeds, .. }) => {
                apply_daily_speeds(&mut edges, speeds);
                apply_minutes(&mut edges, MULTINET_SPEED_FIELDS);
            }
            None => apply_plain_minutes(&mut edges),
        }
        self.context.traffic = traffic;

        let (id, from, to) = self.adapter.street_columns();
        let layout = StreetLayout::from_table(&edges, id, from, to);
        let rows: Vec<StreetRow> = edges.iter().map(|(eid, edge)| StreetRow { object_id: eid.oid(), edge }).collect();
        let written = write_table(&mut self.writer, &layout, &rows)?;
        drop(rows);

        self.context.edges = Some(edges);
        self.context.geometry = Some(GeometryCache::new());
        Ok(written)
    }

    fn traffic_tables(&mut self) -> PipelineResult<(usize, usize)> {
        let Some(traffic) = &self.context.traffic else {
            return Ok((0, 0));
        };
        log::info!("Populating historical traffic tables...");
        let written = match traffic {
            TrafficTable::Patterns { profiles, streets, with_tmc } => (
                write_table(&mut self.writer, &ProfileLayout::here(), profiles)?,
                write_table(&mut self.writer, &StreetPatternLayout { with_tmc: *with_tmc }, streets)?,
            ),
            TrafficTable::Daily { profiles, streets, .. } => (
                write_table(&mut self.writer, &ProfileLayout::multinet(), profiles)?,
                write_table::<_, DailyProfileRow>(&mut self.writer, &(), streets)?,
            ),
        };
        Ok(written)
    }

    fn turns(&mut self, diag: &mut dyn Diagnostics) -> PipelineResult<usize> {
        log::info!("Populating turn table...");
        let table = self.adapter.maneuver_table(diag)?;
        let ctx = &mut self.context;
        let edges = held(&ctx.edges, "edge table")?;
        let restrictions = held(&ctx.turn_restrictions, "turn restrictions")?;
        let cache = held_mut(&mut ctx.geometry, "geometry cache")?;

        let mut builder = TurnBuilder::new(table.max_edges, self.config.edge_fc_id)?;
        let rows = builder.build_all(&table.records, edges, cache, restrictions, diag);
        let layout = turn_layout(table.id_column, table.with_cond_type, table.max_edges, restrictions);
        Ok(write_table(&mut self.writer, &layout, &rows)?)
    }

    fn forks(&mut self, diag: &mut dyn Diagnostics) -> PipelineResult<usize> {
        log::info!("Populating road fork table...");
        let records = self.adapter.fork_table(diag)?;
        let ctx = &mut self.context;
        let edges = held(&ctx.edges, "edge table")?;
        let cache = held_mut(&mut ctx.geometry, "geometry cache")?;

        let rows = ForkResolver::new(self.config.edge_fc_id).resolve_all(&records, edges, cache, diag);
        Ok(write_table::<_, ForkRow>(&mut self.writer, &(), &rows)?)
    }

    /// Both signpost tables are created first and filled in one
    /// [`insert_all`](OutputWriter::insert_all).
    fn signposts(&mut self, diag: &mut dyn Diagnostics) -> PipelineResult<(usize, usize)> {
        log::info!("Populating signpost tables...");
        let records = self.adapter.signpost_table(diag)?;
        let ctx = &mut self.context;
        let edges = held(&ctx.edges, "edge table")?;
        let cache = held_mut(&mut ctx.geometry, "geometry cache")?;

        let tables = SignpostBuilder::new(self.config.edge_fc_id).build_all(&records, edges, cache, diag);
        self.writer.create_table(&SignpostRow::schema(&()))?;
        self.writer.create_table(&SignpostStreetRow::schema(&()))?;
        self.writer.insert_all(&[
            TableBatch::encode::<SignpostRow>(&(), &tables.signposts),
            TableBatch::encode::<SignpostStreetRow>(&(), &tables.streets),
        ])?;
        Ok((tables.signposts.len(), tables.streets.len()))
    }

    fn live_traffic(&mut self, diag: &mut dyn Diagnostics) -> PipelineResult<usize> {
        log::info!("Populating Streets_TMC table...");
        let edges = held(&self.context.edges, "edge table")?;
        let rows = self.adapter.tmc_table(edges, self.config.edge_fc_id, diag)?;
        let (id_column, _, _) = self.adapter.street_columns();
        Ok(write_table(&mut self.writer, &TmcLayout { id_column }, &rows)?)
    }
}
