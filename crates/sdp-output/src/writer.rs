//! The `OutputWriter` trait implemented by all backend writers.

use crate::schema::{Record, Schema, Value};
use crate::{OutputError, OutputResult};

/// Rows for one table, already laid out in schema order.
#[derive(Clone, Debug, PartialEq)]
pub struct TableBatch {
    pub table: String,
    pub rows: Vec<Vec<Value>>,
}

impl TableBatch {
    pub fn encode<R: Record>(layout: &R::Layout, rows: &[R]) -> Self {
        Self {
            table: R::schema(layout).table,
            rows: rows.iter().map(|r| r.values(layout)).collect(),
        }
    }
}

/// Trait implemented by the CSV, SQLite, Parquet and memory writers.
///
/// Every error is fatal for the run; callers propagate it with `?`.
pub trait OutputWriter {
    /// Register a table.  Creating the same table twice is an error.
    fn create_table(&mut self, schema: &Schema) -> OutputResult<()>;

    /// Append rows to a created table.
    fn insert(&mut self, table: &str, rows: &[Vec<Value>]) -> OutputResult<()>;

    /// Append to several tables as one unit.  On error no batch is visible.
    fn insert_all(&mut self, batches: &[TableBatch]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Create the table for `R` and insert `rows`.  Returns the row count.
pub fn write_table<W, R>(writer: &mut W, layout: &R::Layout, rows: &[R]) -> OutputResult<usize>
where
    W: OutputWriter + ?Sized,
    R: Record,
{
    let schema = R::schema(layout);
    writer.create_table(&schema)?;
    let values: Vec<Vec<Value>> = rows.iter().map(|r| r.values(layout)).collect();
    writer.insert(&schema.table, &values)?;
    log::debug!("wrote {} rows to {}", values.len(), schema.table);
    Ok(values.len())
}

/// Width check shared by the backends.
pub(crate) fn check_width(schema: &Schema, rows: &[Vec<Value>]) -> OutputResult<()> {
    match rows.iter().find(|r| r.len() != schema.width()) {
        Some(bad) => Err(OutputError::RowWidth {
            table: schema.table.clone(),
            expected: schema.width(),
            got: bad.len(),
        }),
        None => Ok(()),
    }
}
