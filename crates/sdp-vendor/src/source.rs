//! Tabular input rows.
//!
//! Vendor exports arrive as one table per file.  A [`RowSource`] opens a
//! table by name; rows are deserialized into small `serde` structs that name
//! only the columns an adapter reads, so extra vendor columns are ignored and
//! a missing required column is a CSV error.
//!
//! ```csv
//! LINK_ID,REF_IN_ID,NREF_IN_ID,SPEED_CAT,SHAPE
//! 10,1,2,4,"LINESTRING (0 0, 0.001 0)"
//! ```
//!
//! Numeric ids may be written as integers or as doubles (`1.0`); MultiNet
//! stores its 64-bit ids as doubles.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::{VendorError, VendorResult};

/// Default rows per chunk for large traffic tables.
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

// ── RowSource ─────────────────────────────────────────────────────────────────

/// A named collection of input tables.
pub trait RowSource {
    /// `true` when `table` can be opened.  Optional vendor tables are skipped
    /// when absent.
    fn has_table(&self, table: &str) -> bool;

    /// Raw CSV bytes of `table`, header first.
    fn open(&self, table: &str) -> VendorResult<Box<dyn Read + '_>>;

    /// Every row of `table` accepted by `filter`.
    fn read_rows<T, F>(&self, table: &str, mut filter: F) -> VendorResult<Vec<T>>
    where
        T: DeserializeOwned,
        F: FnMut(&T) -> bool,
        Self: Sized,
    {
        let mut rows = Vec::new();
        for row in reader(self.open(table)?).into_deserialize::<T>() {
            let row = row.map_err(|source| csv_error(table, source))?;
            if filter(&row) {
                rows.push(row);
            }
        }
        log::debug!("read {} rows from {table}", rows.len());
        Ok(rows)
    }

    /// Every row of `table`.
    fn read_all<T: DeserializeOwned>(&self, table: &str) -> VendorResult<Vec<T>>
    where
        Self: Sized,
    {
        self.read_rows(table, |_| true)
    }

    /// Rows of `table` in chunks of at most `chunk_size`, so huge traffic
    /// tables never sit in memory whole.
    fn read_chunks<T: DeserializeOwned>(&self, table: &str, chunk_size: usize) -> VendorResult<Chunks<'_, T>>
    where
        Self: Sized,
    {
        Ok(Chunks {
            rows: reader(self.open(table)?).into_deserialize(),
            table: table.to_string(),
            chunk_size: chunk_size.max(1),
            done: false,
        })
    }
}

fn reader<'a>(input: Box<dyn Read + 'a>) -> csv::Reader<Box<dyn Read + 'a>> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input)
}

fn csv_error(table: &str, source: csv::Error) -> VendorError {
    VendorError::Csv { table: table.to_string(), source }
}

/// Iterator returned by [`RowSource::read_chunks`].
pub struct Chunks<'a, T> {
    rows: csv::DeserializeRecordsIntoIter<Box<dyn Read + 'a>, T>,
    table: String,
    chunk_size: usize,
    done: bool,
}

impl<T: DeserializeOwned> Iterator for Chunks<'_, T> {
    type Item = VendorResult<Vec<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut chunk = Vec::with_capacity(self.chunk_size.min(DEFAULT_CHUNK_SIZE));
        while chunk.len() < self.chunk_size {
            match self.rows.next() {
                Some(Ok(row)) => chunk.push(row),
                Some(Err(source)) => {
                    self.done = true;
                    return Some(Err(csv_error(&self.table, source)));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        if chunk.is_empty() { None } else { Some(Ok(chunk)) }
    }
}

// ── CsvSource ─────────────────────────────────────────────────────────────────

/// Tables read from `<dir>/<table>.csv`, or registered in memory.
///
/// In-memory tables shadow files of the same name.
#[derive(Debug, Default)]
pub struct CsvSource {
    dir: Option<PathBuf>,
    tables: FxHashMap<String, String>,
}

impl CsvSource {
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: Some(dir.into()), tables: FxHashMap::default() }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Register `table` with its full CSV text.
    pub fn with_table(mut self, table: &str, csv_text: &str) -> Self {
        self.insert(table, csv_text);
        self
    }

    pub fn insert(&mut self, table: &str, csv_text: &str) {
        self.tables.insert(table.to_string(), csv_text.to_string());
    }

    fn path(&self, table: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.join(format!("{table}.csv")))
    }
}

impl RowSource for CsvSource {
    fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table) || self.path(table).is_some_and(|p| p.is_file())
    }

    fn open(&self, table: &str) -> VendorResult<Box<dyn Read + '_>> {
        if let Some(text) = self.tables.get(table) {
            return Ok(Box::new(Cursor::new(text.as_bytes())));
        }
        match self.path(table) {
            Some(path) if path.is_file() => Ok(Box::new(BufReader::new(File::open(path)?))),
            _ => Err(VendorError::MissingTable(table.to_string())),
        }
    }
}

// ── Field helpers ─────────────────────────────────────────────────────────────

/// Parse an id cell.  Plain integers are read exactly; a double is accepted
/// when it holds a whole number within `i64` range.
fn parse_id(cell: &str) -> Result<i64, String> {
    let cell = cell.trim();
    if let Ok(id) = cell.parse::<i64>() {
        return Ok(id);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
        _ => Err(format!("{cell} is not an integer id")),
    }
}

/// Deserialize an id written either as an integer or as a double.
pub(crate) fn float_id<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    parse_id(&String::deserialize(d)?).map_err(serde::de::Error::custom)
}

/// Like [`float_id`] for optional columns; an empty cell is `None`.
pub(crate) fn opt_float_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    match Option::<String>::deserialize(d)? {
        Some(cell) if !cell.trim().is_empty() => parse_id(&cell).map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
