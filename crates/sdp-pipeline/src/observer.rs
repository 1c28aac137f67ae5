//! Pipeline observer trait for progress reporting.

use crate::context::Checkpoint;
use crate::pipeline::RunSummary;

/// Output stages in run order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Streets,
    Traffic,
    Turns,
    Forks,
    Signposts,
    LiveTraffic,
    TimeZones,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Streets => "streets",
            Stage::Traffic => "historical traffic",
            Stage::Turns => "restricted turns",
            Stage::Forks => "road forks",
            Stage::Signposts => "signposts",
            Stage::LiveTraffic => "live traffic",
            Stage::TimeZones => "time zones",
        }
    }
}

/// Callbacks invoked by [`Pipeline::run`][crate::Pipeline::run] at stage
/// boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — stage timer
///
/// ```rust,ignore
/// struct Timer(std::time::Instant);
///
/// impl PipelineObserver for Timer {
///     fn on_stage_start(&mut self, _stage: Stage) {
///         self.0 = std::time::Instant::now();
///     }
///     fn on_stage_end(&mut self, stage: Stage, rows: usize) {
///         println!("{}: {rows} rows in {:?}", stage.as_str(), self.0.elapsed());
///     }
/// }
/// ```
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: Stage) {}

    /// `rows` is the number of rows written to the stage's main table.
    fn on_stage_end(&mut self, _stage: Stage, _rows: usize) {}

    /// Called after shared data is dropped.
    fn on_checkpoint(&mut self, _checkpoint: Checkpoint) {}

    /// Called once after every table is written and the writer finished.
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// A [`PipelineObserver`] that does nothing.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
