//! CSV output backend.
//!
//! One `<Table>.csv` per created table in the configured output directory.
//! The header row is written on creation.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::schema::{Schema, Value};
use crate::writer::{OutputWriter, TableBatch, check_width};
use crate::{OutputError, OutputResult};

struct CsvTable {
    schema: Schema,
    writer: Writer<File>,
}

/// Writes output tables to CSV files.
pub struct CsvWriter {
    dir: PathBuf,
    tables: BTreeMap<String, CsvTable>,
    finished: bool,
}

fn record(row: &[Value]) -> Vec<String> {
    row.iter().map(Value::to_string).collect()
}

impl CsvWriter {
    /// Use `dir` (created if missing) for all table files.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf(), tables: BTreeMap::new(), finished: false })
    }

    pub fn path_of(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }

    fn table(&self, name: &str) -> OutputResult<&CsvTable> {
        self.tables.get(name).ok_or_else(|| OutputError::UnknownTable(name.to_string()))
    }
}

impl OutputWriter for CsvWriter {
    fn create_table(&mut self, schema: &Schema) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        if self.tables.contains_key(&schema.table) {
            return Err(OutputError::DuplicateTable(schema.table.clone()));
        }
        let mut writer = Writer::from_path(self.path_of(&schema.table))?;
        writer.write_record(schema.names())?;
        self.tables.insert(schema.table.clone(), CsvTable { schema: schema.clone(), writer });
        Ok(())
    }

    fn insert(&mut self, table: &str, rows: &[Vec<Value>]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        check_width(&self.table(table)?.schema, rows)?;
        if let Some(t) = self.tables.get_mut(table) {
            for row in rows {
                t.writer.write_record(record(row))?;
            }
        }
        Ok(())
    }

    /// Every batch is validated before any row is written, so a bad batch
    /// leaves all files untouched.
    fn insert_all(&mut self, batches: &[TableBatch]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        for b in batches {
            check_width(&self.table(&b.table)?.schema, &b.rows)?;
        }
        for b in batches {
            if let Some(t) = self.tables.get_mut(&b.table) {
                for row in &b.rows {
                    t.writer.write_record(record(row))?;
                }
                t.writer.flush()?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        for t in self.tables.values_mut() {
            t.writer.flush()?;
        }
        Ok(())
    }
}
