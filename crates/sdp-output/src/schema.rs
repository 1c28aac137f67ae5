//! Column model shared by all writers.

use std::fmt;

use rustc_hash::FxHashMap;

use sdp_network::AttrValue;

// ── Value ─────────────────────────────────────────────────────────────────────

/// One cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to the storage type of a column.  Values that do not fit
    /// (text in a numeric column) become `Null`.
    pub fn coerce(&self, ty: ColumnType) -> Value {
        match (self, ty) {
            (Value::Null, _) => Value::Null,
            (Value::Int(i), ColumnType::Int) => Value::Int(*i),
            (Value::Int(i), ColumnType::Float) => Value::Float(*i as f64),
            (Value::Float(f), ColumnType::Float) => Value::Float(*f),
            (Value::Float(f), ColumnType::Int) => Value::Int(f.round() as i64),
            (Value::Text(s), ColumnType::Text) => Value::Text(s.clone()),
            (v, ColumnType::Text) => Value::Text(v.to_string()),
            (Value::Text(_), _) => Value::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&AttrValue> for Value {
    fn from(v: &AttrValue) -> Self {
        match v {
            AttrValue::Text(s) => Value::Text(s.clone()),
            AttrValue::Int(i) => Value::Int(*i),
            AttrValue::Number(x) => Value::Float(*x),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ── Schema ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Text,
}

impl ColumnType {
    pub fn of(value: &AttrValue) -> ColumnType {
        match value {
            AttrValue::Text(_) => ColumnType::Text,
            AttrValue::Int(_) => ColumnType::Int,
            AttrValue::Number(_) => ColumnType::Float,
        }
    }

    /// Narrowest type holding values of both `self` and `other`.
    pub fn widen(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnType::Text, _) | (_, ColumnType::Text) => ColumnType::Text,
            _ => ColumnType::Float,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Table name plus ordered columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    pub table: String,
    pub columns: Vec<Column>,
}

impl Schema {
    pub fn new(table: impl Into<String>) -> Self {
        Self { table: table.into(), columns: Vec::new() }
    }

    /// Builder-style column append.
    pub fn col(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.columns.push(Column::new(name, ty));
        self
    }

    pub fn push(&mut self, name: impl Into<String>, ty: ColumnType) {
        self.columns.push(Column::new(name, ty));
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Columns for dynamically named attribute fields.
///
/// Each field takes the widest type of the values seen for it; fields never
/// seen with a value are text.
pub fn infer_columns<'a, I>(fields: &[String], values: I) -> Vec<Column>
where
    I: IntoIterator<Item = (&'a str, &'a AttrValue)>,
{
    let slot: FxHashMap<&str, usize> =
        fields.iter().enumerate().map(|(i, f)| (f.as_str(), i)).collect();
    let mut types: Vec<Option<ColumnType>> = vec![None; fields.len()];
    for (name, value) in values {
        if let Some(&i) = slot.get(name) {
            let ty = ColumnType::of(value);
            types[i] = Some(types[i].map_or(ty, |t| t.widen(ty)));
        }
    }
    fields
        .iter()
        .zip(types)
        .map(|(name, ty)| Column::new(name.clone(), ty.unwrap_or(ColumnType::Text)))
        .collect()
}

// ── Record ────────────────────────────────────────────────────────────────────

/// A typed output row.
///
/// `Layout` carries whatever decides the column set at run time (attribute
/// field lists, maximum turn width, vendor id column names).  Rows with a
/// fixed column set use `()`.
pub trait Record {
    type Layout;

    fn schema(layout: &Self::Layout) -> Schema;

    /// Cell values in schema column order.
    fn values(&self, layout: &Self::Layout) -> Vec<Value>;
}
