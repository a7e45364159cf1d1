//! Cell values and result tables

use std::borrow::Cow;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::schema::CellKind;

/// Layout used when a timestamp is displayed without a configured format
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A decoded cell value, also used for statement bind arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    Bytes(Vec<u8>),
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Runtime kind of this value
    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::Null => CellKind::Null,
            CellValue::Bool(_) => CellKind::Bool,
            CellValue::Integer(_) => CellKind::Integer,
            CellValue::Float(_) => CellKind::Float,
            CellValue::Text(_) => CellKind::Text,
            CellValue::Timestamp(_) => CellKind::Timestamp,
            CellValue::Bytes(_) => CellKind::Bytes,
        }
    }

    /// Convert to a display string.
    ///
    /// Nulls display as the empty string and byte sequences as lossy UTF-8.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Integer(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Timestamp(ts) => Cow::Owned(ts.format(DEFAULT_DATETIME_FORMAT).to_string()),
            CellValue::Bytes(b) => String::from_utf8_lossy(b),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Integer(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(ts: NaiveDateTime) -> Self {
        CellValue::Timestamp(ts)
    }
}

impl From<Vec<u8>> for CellValue {
    fn from(b: Vec<u8>) -> Self {
        CellValue::Bytes(b)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A query result with every cell rendered as a string.
///
/// The header is kept apart from the data rows; [`Table::records`] yields the
/// header first when the record form is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column names in result order
    pub header: Vec<String>,
    /// Data rows, each as wide as the header
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a new table with a header and no rows
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Build a table from records where the first record is the header.
    ///
    /// Returns `None` when there are no records or a row is not as wide as the header.
    pub fn from_records(records: Vec<Vec<String>>) -> Option<Self> {
        let mut records = records.into_iter();
        let header = records.next()?;
        let rows: Vec<Vec<String>> = records.collect();
        if rows.iter().any(|row| row.len() != header.len()) {
            return None;
        }
        Some(Self { header, rows })
    }

    /// Convert into records, header first
    pub fn into_records(self) -> Vec<Vec<String>> {
        let mut records = Vec::with_capacity(self.rows.len() + 1);
        records.push(self.header);
        records.extend(self.rows);
        records
    }

    /// Iterate over the header followed by every data row
    pub fn records(&self) -> impl Iterator<Item = &Vec<String>> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }

    /// Add a data row
    pub fn add_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.header.len());
        self.rows.push(row);
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|c| c == name)
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of records including the header
    pub fn record_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// A query result that keeps the decoded values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ValueTable {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<CellValue>) {
        debug_assert_eq!(row.len(), self.header.len());
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|c| c == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
