//! `sdp-pipeline` — stage orchestrator for the street data preparation engine.
//!
//! # Stage sequence
//!
//! ```text
//! ① Streets     — edge_table → resolve_streets → derived flags
//!                 → traffic speeds / minutes → Streets
//!                 (restriction rows released)
//! ② Traffic     — Patterns + Streets_Patterns   (HERE)
//!                 DailyProfiles + Streets_DailyProfiles (MultiNet)
//!                 (traffic frames released)
//! ③ Turns       — maneuver_table → RestrictedTurns
//! ④ Forks       — fork_table → Streets_RoadSplits
//!                 (maneuver paths released)
//! ⑤ Signposts   — Signposts + Signposts_Streets, one insert
//!                 (geometry cache released)
//! ⑥ Live traffic — Streets_TMC                   (if live_traffic)
//! ⑦ Time zones  — TimeZones                     (if time_zone)
//! ```
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `serde`   | `Deserialize` / `Serialize` on [`PipelineConfig`].      |
//! | `sqlite`  | Enables `sdp_output::SqliteWriter`.                      |
//! | `parquet` | Enables `sdp_output::ParquetWriter`.                     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sdp_core::LogDiagnostics;
//! use sdp_output::CsvWriter;
//! use sdp_pipeline::{NoopObserver, PipelineBuilder, PipelineConfig};
//! use sdp_vendor::CsvSource;
//!
//! let mut pipeline = PipelineBuilder::new(PipelineConfig::multinet(), CsvWriter::new(out)?)
//!     .source(CsvSource::from_dir(input))
//!     .build()?;
//! let summary = pipeline.run(&mut NoopObserver, &mut LogDiagnostics::new())?;
//! ```

pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod observer;
pub mod pipeline;


pub use builder::PipelineBuilder;
pub use config::{PipelineConfig, TimeZone, Vendor};
pub use context::{Checkpoint, PipelineContext};
pub use error::{PipelineError, PipelineResult};
pub use observer::{NoopObserver, PipelineObserver, Stage};
pub use pipeline::{Pipeline, RunSummary};
pub use sdp_vendor::HistoricalTraffic;
