//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `network.db` in the output directory with one table per
//! created schema.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, Transaction};

use crate::schema::{ColumnType, Schema, Value};
use crate::writer::{OutputWriter, TableBatch, check_width};
use crate::{OutputError, OutputResult};

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Int(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Float(x) => ToSqlOutput::Borrowed(ValueRef::Real(*x)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

fn sql_type(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Int => "INTEGER",
        ColumnType::Float => "REAL",
        ColumnType::Text => "TEXT",
    }
}

struct SqliteTable {
    schema: Schema,
    insert_sql: String,
}

/// Writes output tables to an SQLite database.
pub struct SqliteWriter {
    conn: Connection,
    tables: BTreeMap<String, SqliteTable>,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `network.db` in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("network.db"))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;",
        )?;
        Ok(Self { conn, tables: BTreeMap::new(), finished: false })
    }

    /// The underlying connection, for inspection after writing.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn table(&self, name: &str) -> OutputResult<&SqliteTable> {
        self.tables.get(name).ok_or_else(|| OutputError::UnknownTable(name.to_string()))
    }

    /// Validate every `(table, rows)` pair, then insert them all in one
    /// transaction.
    fn insert_tables(&mut self, tables: &[(&str, &[Vec<Value>])]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        for &(name, rows) in tables {
            check_width(&self.table(name)?.schema, rows)?;
        }
        let tx = self.conn.unchecked_transaction()?;
        for &(name, rows) in tables {
            Self::insert_in(&tx, self.table(name)?, rows)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_in(tx: &Transaction<'_>, table: &SqliteTable, rows: &[Vec<Value>]) -> OutputResult<()> {
        let mut stmt = tx.prepare_cached(&table.insert_sql)?;
        for row in rows {
            stmt.execute(rusqlite::params_from_iter(row.iter()))?;
        }
        Ok(())
    }
}

impl OutputWriter for SqliteWriter {
    fn create_table(&mut self, schema: &Schema) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        if self.tables.contains_key(&schema.table) {
            return Err(OutputError::DuplicateTable(schema.table.clone()));
        }
        let cols: Vec<String> = schema
            .columns
            .iter()
            .map(|c| format!("\"{}\" {}", c.name, sql_type(c.ty)))
            .collect();
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS \"{0}\"; CREATE TABLE \"{0}\" ({1});",
            schema.table,
            cols.join(", ")
        ))?;

        let names: Vec<String> = schema.names().map(|n| format!("\"{n}\"")).collect();
        let marks: Vec<String> = (1..=schema.width()).map(|i| format!("?{i}")).collect();
        let insert_sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            schema.table,
            names.join(", "),
            marks.join(", ")
        );
        self.tables.insert(schema.table.clone(), SqliteTable { schema: schema.clone(), insert_sql });
        Ok(())
    }

    fn insert(&mut self, table: &str, rows: &[Vec<Value>]) -> OutputResult<()> {
        self.insert_tables(&[(table, rows)])
    }

    /// One transaction for every batch; any failure rolls all of them back.
    fn insert_all(&mut self, batches: &[TableBatch]) -> OutputResult<()> {
        let tables: Vec<(&str, &[Vec<Value>])> =
            batches.iter().map(|b| (b.table.as_str(), b.rows.as_slice())).collect();
        self.insert_tables(&tables)
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
