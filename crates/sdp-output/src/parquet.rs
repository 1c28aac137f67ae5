//! Parquet output backend (feature `parquet`).
//!
//! One `<Table>.parquet` per created table.  All columns are nullable.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, Int64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::schema::{ColumnType, Schema, Value};
use crate::writer::{OutputWriter, TableBatch, check_width};
use crate::{OutputError, OutputResult};

fn arrow_schema(schema: &Schema) -> Arc<ArrowSchema> {
    let fields: Vec<Field> = schema
        .columns
        .iter()
        .map(|c| {
            let ty = match c.ty {
                ColumnType::Int => DataType::Int64,
                ColumnType::Float => DataType::Float64,
                ColumnType::Text => DataType::Utf8,
            };
            Field::new(c.name.as_str(), ty, true)
        })
        .collect();
    Arc::new(ArrowSchema::new(fields))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Build one column array, coercing each cell to the column type.
fn column_array(rows: &[Vec<Value>], col: usize, ty: ColumnType) -> ArrayRef {
    match ty {
        ColumnType::Int => {
            let mut b = Int64Builder::with_capacity(rows.len());
            for r in rows {
                b.append_option(r[col].coerce(ty).as_i64());
            }
            Arc::new(b.finish())
        }
        ColumnType::Float => {
            let mut b = Float64Builder::with_capacity(rows.len());
            for r in rows {
                b.append_option(r[col].coerce(ty).as_f64());
            }
            Arc::new(b.finish())
        }
        ColumnType::Text => {
            let mut b = StringBuilder::new();
            for r in rows {
                match r[col].coerce(ty) {
                    Value::Text(s) => b.append_value(s),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
    }
}

struct ParquetTable {
    schema: Schema,
    arrow: Arc<ArrowSchema>,
    writer: Option<ArrowWriter<File>>,
}

impl ParquetTable {
    fn batch(&self, rows: &[Vec<Value>]) -> OutputResult<RecordBatch> {
        let arrays: Vec<ArrayRef> = self
            .schema
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| column_array(rows, i, c.ty))
            .collect();
        Ok(RecordBatch::try_new(Arc::clone(&self.arrow), arrays)?)
    }
}

/// Writes output tables to Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    dir: PathBuf,
    tables: BTreeMap<String, ParquetTable>,
}

impl ParquetWriter {
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf(), tables: BTreeMap::new() })
    }

    fn table(&self, name: &str) -> OutputResult<&ParquetTable> {
        self.tables.get(name).ok_or_else(|| OutputError::UnknownTable(name.to_string()))
    }
}

impl OutputWriter for ParquetWriter {
    fn create_table(&mut self, schema: &Schema) -> OutputResult<()> {
        if self.tables.contains_key(&schema.table) {
            return Err(OutputError::DuplicateTable(schema.table.clone()));
        }
        let arrow = arrow_schema(schema);
        let file = File::create(self.dir.join(format!("{}.parquet", schema.table)))?;
        let writer = ArrowWriter::try_new(file, Arc::clone(&arrow), Some(snappy_props()))?;
        self.tables.insert(
            schema.table.clone(),
            ParquetTable { schema: schema.clone(), arrow, writer: Some(writer) },
        );
        Ok(())
    }

    fn insert(&mut self, table: &str, rows: &[Vec<Value>]) -> OutputResult<()> {
        self.insert_all(&[TableBatch { table: table.to_string(), rows: rows.to_vec() }])
    }

    /// Record batches for every table are built before any is written.
    fn insert_all(&mut self, batches: &[TableBatch]) -> OutputResult<()> {
        let mut built = Vec::with_capacity(batches.len());
        for b in batches {
            let t = self.table(&b.table)?;
            if t.writer.is_none() {
                return Err(OutputError::Finished);
            }
            check_width(&t.schema, &b.rows)?;
            if !b.rows.is_empty() {
                built.push((b.table.as_str(), t.batch(&b.rows)?));
            }
        }
        for (name, batch) in built {
            if let Some(w) = self.tables.get_mut(name).and_then(|t| t.writer.as_mut()) {
                w.write(&batch)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        for t in self.tables.values_mut() {
            if let Some(w) = t.writer.take() {
                w.close()?;
            }
        }
        Ok(())
    }
}
