//! sample — run the street data preparation pipeline end to end.
//!
//! ```text
//! sample                          # built-in HERE sample → output/sample
//! sample config.json <input-dir>  # vendor CSV exports → output/sample
//! ```
//!
//! `config.json` holds a `PipelineConfig`; absent fields take their
//! defaults, e.g. `{"vendor": "MultiNet", "historical_traffic": "Enabled"}`.

mod network;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};

use sdp_core::{Diagnostics, LogDiagnostics};
use sdp_output::CsvWriter;
use sdp_pipeline::{
    Checkpoint, HistoricalTraffic, PipelineBuilder, PipelineConfig, PipelineObserver, RunSummary, Stage, TimeZone,
};
use sdp_vendor::CsvSource;

use network::build_sample;

const OUTPUT_DIR: &str = "output/sample";

// ── Observer that times each stage ────────────────────────────────────────────

struct StageTimer {
    started: Instant,
}

impl PipelineObserver for StageTimer {
    fn on_stage_start(&mut self, _stage: Stage) {
        self.started = Instant::now();
    }

    fn on_stage_end(&mut self, stage: Stage, rows: usize) {
        println!("  {:<20} {:>8} rows  {:>8.3} s", stage.as_str(), rows, self.started.elapsed().as_secs_f64());
    }

    fn on_checkpoint(&mut self, checkpoint: Checkpoint) {
        log::debug!("released {}", checkpoint.as_str());
    }
}

fn load_config(path: &Path) -> Result<PipelineConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_summary(s: &RunSummary) {
    println!();
    println!("{:<24} {:>8}", "Table", "Rows");
    println!("{}", "-".repeat(33));
    for (table, rows) in [
        ("Streets", s.streets),
        ("Patterns/DailyProfiles", s.profiles),
        ("Streets_<profiles>", s.street_profiles),
        ("RestrictedTurns", s.turns),
        ("Streets_RoadSplits", s.forks),
        ("Signposts", s.signposts),
        ("Signposts_Streets", s.signpost_streets),
        ("Streets_TMC", s.tmc),
        ("TimeZones", s.time_zones),
    ] {
        println!("{table:<24} {rows:>8}");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config, source) = match args.as_slice() {
        [] => {
            let config = PipelineConfig {
                historical_traffic: HistoricalTraffic::LinkReference,
                live_traffic: true,
                time_zone: TimeZone::Single("Central Standard Time".to_string()),
                ..PipelineConfig::here()
            };
            (config, build_sample())
        }
        [config, input] => (load_config(Path::new(config))?, CsvSource::from_dir(PathBuf::from(input))),
        _ => bail!("usage: sample [config.json input-dir]"),
    };

    println!("=== sample — street data preparation ===");
    println!("Vendor: {:?}  |  Traffic: {:?}", config.vendor, config.historical_traffic);
    println!();

    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut pipeline = PipelineBuilder::new(config, writer).source(source).build()?;

    let mut diag = LogDiagnostics::new();
    let t0 = Instant::now();
    let summary = pipeline.run(&mut StageTimer { started: t0 }, &mut diag)?;

    println!();
    println!("Pipeline complete in {:.3} s, {} warnings", t0.elapsed().as_secs_f64(), diag.warning_count());
    print_summary(&summary);
    Ok(())
}
