//! `sdp-output` — output tables for the street data preparation engine.
//!
//! Every output table has one typed row struct implementing [`Record`].  A
//! row knows its own column layout; writers only ever see a [`Schema`] and
//! positional [`Value`]s.
//!
//! | Feature   | Backend      | Files created                        |
//! |-----------|--------------|--------------------------------------|
//! | *(none)*  | CSV          | `<Table>.csv` per table              |
//! | *(none)*  | memory       | nothing (tests, embedding)           |
//! | `sqlite`  | SQLite       | `network.db`                         |
//! | `parquet` | Parquet      | `<Table>.parquet` per table          |
//!
//! All backends implement [`OutputWriter`].  [`OutputWriter::insert_all`]
//! writes several tables as one unit: either every batch lands or none does
//! (Signposts and Signposts_Streets are written this way).
//!
//! # Usage
//!
//! ```rust,ignore
//! use sdp_output::{CsvWriter, ForkRow, write_table};
//!
//! let mut writer = CsvWriter::new(Path::new("./network"))?;
//! write_table(&mut writer, &(), &fork_rows)?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod row;
pub mod schema;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use memory::{MemoryTable, MemoryWriter};
pub use row::{
    BranchText, DailyProfileRow, ForkEdge, ForkRow, MAX_FORK_BRANCHES, MAX_SIGN_SLOTS, ProfileLayout,
    ProfileRow, SignText, SignpostRow, SignpostStreetRow, StreetLayout, StreetPatternLayout,
    StreetPatternRow, StreetRow, StreetTmcRow, TimeZoneRow, TmcLayout, TurnEdge, TurnLayout, TurnRow,
};
pub use schema::{Column, ColumnType, Record, Schema, Value, infer_columns};
pub use writer::{OutputWriter, TableBatch, write_table};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
