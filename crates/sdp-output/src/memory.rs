//! In-memory backend.  Keeps every table as a `Vec` of rows.

use std::collections::BTreeMap;

use crate::schema::{Schema, Value};
use crate::writer::{OutputWriter, TableBatch, check_width};
use crate::{OutputError, OutputResult};

#[derive(Clone, Debug)]
pub struct MemoryTable {
    pub schema: Schema,
    pub rows: Vec<Vec<Value>>,
}

impl MemoryTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.schema.index_of(column)?;
        self.rows.get(row)?.get(col)
    }

    /// All cells of one column.
    pub fn column(&self, column: &str) -> Vec<&Value> {
        match self.schema.index_of(column) {
            Some(col) => self.rows.iter().map(|r| &r[col]).collect(),
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryWriter {
    tables: BTreeMap<String, MemoryTable>,
    finished: bool,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn check(&self, table: &str, rows: &[Vec<Value>]) -> OutputResult<()> {
        let t = self.tables.get(table).ok_or_else(|| OutputError::UnknownTable(table.to_string()))?;
        check_width(&t.schema, rows)
    }
}

impl OutputWriter for MemoryWriter {
    fn create_table(&mut self, schema: &Schema) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        if self.tables.contains_key(&schema.table) {
            return Err(OutputError::DuplicateTable(schema.table.clone()));
        }
        self.tables
            .insert(schema.table.clone(), MemoryTable { schema: schema.clone(), rows: Vec::new() });
        Ok(())
    }

    fn insert(&mut self, table: &str, rows: &[Vec<Value>]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        self.check(table, rows)?;
        if let Some(t) = self.tables.get_mut(table) {
            t.rows.extend_from_slice(rows);
        }
        Ok(())
    }

    fn insert_all(&mut self, batches: &[TableBatch]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        for b in batches {
            self.check(&b.table, &b.rows)?;
        }
        for b in batches {
            if let Some(t) = self.tables.get_mut(&b.table) {
                t.rows.extend_from_slice(&b.rows);
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
