use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Key – the join key of a row
// ---------------------------------------------------------------------------

/// Value of the join key column.  Integers compare numerically, so `"7"` and
/// `"07"` name the same row; anything else is kept as trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Text(String),
}

impl Key {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(i) => Key::Int(i),
            Err(_) => Key::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell interpreted with a guessed type
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, the result of typed column access.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw cell.  Missing cells are `Null`.
    pub fn guess(raw: Option<&str>) -> Self {
        let Some(s) = raw else {
            return CellValue::Null;
        };
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        if let Some(d) = parse_date(s) {
            return CellValue::Date(d);
        }
        CellValue::String(s.to_string())
    }
}

/// Parse an ISO-8601 date, ignoring a trailing time component if present.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Column – one column of the merged table
// ---------------------------------------------------------------------------

/// A column contributed by one fragment file.  Cells are aligned with the
/// table's keys; `None` marks a row that fragment did not provide (or an
/// empty cell).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    /// Fragment file the column was read from.
    pub fragment: PathBuf,
    pub values: Vec<Option<String>>,
}

impl Column {
    pub fn new(name: impl Into<String>, fragment: impl Into<PathBuf>) -> Self {
        Column {
            name: name.into(),
            fragment: fragment.into(),
            values: Vec::new(),
        }
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        self.values.get(row).and_then(|v| v.as_deref())
    }

    fn set(&mut self, row: usize, value: Option<String>) {
        if self.values.len() <= row {
            self.values.resize(row + 1, None);
        }
        self.values[row] = value;
    }
}

// ---------------------------------------------------------------------------
// MergedTable – the wide, key-aligned table
// ---------------------------------------------------------------------------

/// All fragment columns aligned on the join key.
///
/// Rows follow first-seen key order over the fragment processing order;
/// columns follow fragment order, then header order.  Column names may repeat
/// when two fragments provide the same name; [`MergedTable::column`] returns
/// the first one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedTable {
    key_column: String,
    keys: Vec<Key>,
    columns: Vec<Column>,
    positions: HashMap<Key, usize>,
}

impl MergedTable {
    pub fn new(key_column: impl Into<String>) -> Self {
        MergedTable {
            key_column: key_column.into(),
            ..Default::default()
        }
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Names of every column, repeated names included, in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Column> + 'a {
        self.columns.iter().filter(move |c| c.name == name)
    }

    pub fn row_of(&self, key: &Key) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        self.column(name).and_then(|c| c.get(row))
    }

    /// Typed view of a column, one value per row.
    pub fn typed(&self, name: &str) -> Option<Vec<CellValue>> {
        let col = self.column(name)?;
        Some((0..self.len()).map(|row| CellValue::guess(col.get(row))).collect())
    }

    /// Column parsed as dates; unparsable or missing cells become `None`.
    pub fn dates(&self, name: &str) -> Option<Vec<Option<NaiveDate>>> {
        let col = self.column(name)?;
        Some((0..self.len()).map(|row| col.get(row).and_then(parse_date)).collect())
    }

    // -- Construction, used by the loader --

    /// Row of `key`, appending a new row if the key is unseen.
    pub(crate) fn row_for(&mut self, key: Key) -> usize {
        if let Some(&row) = self.positions.get(&key) {
            return row;
        }
        let row = self.keys.len();
        self.positions.insert(key.clone(), row);
        self.keys.push(key);
        row
    }

    pub(crate) fn push_column(&mut self, column: Column) -> usize {
        self.columns.push(column);
        self.columns.len() - 1
    }

    pub(crate) fn set_cell(&mut self, column: usize, row: usize, value: Option<String>) {
        self.columns[column].set(row, value);
    }

    /// Pad every column to the final row count.
    pub(crate) fn finish(&mut self) {
        let rows = self.keys.len();
        for col in &mut self.columns {
            col.values.resize(rows, None);
        }
    }
}

// ---------------------------------------------------------------------------
// Timed – a result with its wall-clock duration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    /// Wall-clock seconds spent producing `value`.
    pub elapsed: f64,
}

impl<T> Timed<T> {
    /// Run `f` and record how long it took.
    pub fn measure<E>(f: impl FnOnce() -> Result<T, E>) -> Result<Self, E> {
        let start = std::time::Instant::now();
        let value = f()?;
        Ok(Timed {
            value,
            elapsed: start.elapsed().as_secs_f64(),
        })
    }
}

pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
