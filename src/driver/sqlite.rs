//! SQLite driver backed by rusqlite

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rusqlite::{params_from_iter, Batch};
use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};

use crate::error::DriverError;
use crate::model::CellValue;

use super::{Connection, Driver, ExecOutcome, RowCursor};

/// Layout used when binding timestamps
const BIND_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Text layouts decoded from date/time columns, tried in order after RFC 3339
const TIMESTAMP_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Driver for SQLite database files
pub struct SqliteDriver;

impl Driver for SqliteDriver {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn supports_name(&self, name: &str) -> bool {
        matches!(name.to_lowercase().as_str(), "sqlite" | "sqlite3")
    }

    fn open(&self, dsn: &str) -> Result<Box<dyn Connection>, DriverError> {
        let conn = if dsn.is_empty() || dsn == ":memory:" {
            rusqlite::Connection::open_in_memory()?
        } else {
            rusqlite::Connection::open(dsn)?
        };
        tracing::debug!(dsn, "opened sqlite database");
        Ok(Box::new(SqliteConnection::new(conn)))
    }
}

/// An open SQLite connection
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    /// Wrap an existing rusqlite connection
    pub fn new(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Access the underlying rusqlite connection
    pub fn inner(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

impl Connection for SqliteConnection {
    fn ping(&self) -> Result<(), DriverError> {
        self.conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    fn query<'a>(
        &'a self,
        sql: &str,
        args: &[CellValue],
    ) -> Result<Box<dyn RowCursor + 'a>, DriverError> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let types: Vec<String> = stmt
            .columns()
            .iter()
            .map(|c| c.decl_type().unwrap_or_default().to_uppercase())
            .collect();

        // Rows borrow the statement, so they are stepped here and buffered.
        let mut rows = stmt.query(params_from_iter(args.iter()))?;
        let mut buffered = VecDeque::new();
        let mut terminal = None;
        loop {
            match rows.next() {
                Ok(Some(row)) => buffered.push_back(decode_row(row, &types)),
                Ok(None) => break,
                Err(e) => {
                    terminal = Some(DriverError::from(e));
                    break;
                }
            }
        }

        Ok(Box::new(SqliteCursor {
            columns,
            types,
            rows: buffered,
            current: None,
            terminal,
            open: true,
        }))
    }

    /// Run every statement in `sql`, binding `args` to their placeholders in order.
    ///
    /// Statements that produce rows are stepped to completion and report no count.
    fn exec(&self, sql: &str, args: &[CellValue]) -> Result<ExecOutcome, DriverError> {
        let mut batch = Batch::new(&self.conn, sql);
        let mut remaining = args;
        let mut affected = None;
        let mut statements = 0;

        while let Some(mut stmt) = batch.next()? {
            statements += 1;
            let wanted = stmt.parameter_count();
            if wanted > remaining.len() {
                return Err(DriverError::Message(format!(
                    "statement {} needs {} arguments, {} left",
                    statements,
                    wanted,
                    remaining.len()
                )));
            }
            let (bound, rest) = remaining.split_at(wanted);
            for (index, value) in bound.iter().enumerate() {
                stmt.raw_bind_parameter(index + 1, value)?;
            }
            remaining = rest;

            affected = if stmt.column_count() == 0 {
                Some(stmt.raw_execute()? as i64)
            } else {
                let mut rows = stmt.raw_query();
                while rows.next()?.is_some() {}
                None
            };
        }

        if !remaining.is_empty() {
            return Err(DriverError::Message(format!(
                "{} arguments left unused",
                remaining.len()
            )));
        }

        tracing::debug!(statements, "sqlite exec");
        Ok(ExecOutcome {
            last_insert_id: Some(self.conn.last_insert_rowid()),
            rows_affected: affected,
        })
    }

    fn close(self: Box<Self>) -> Result<(), DriverError> {
        self.conn.close().map_err(|(_, e)| DriverError::from(e))
    }
}

/// Cursor over rows already stepped from SQLite
struct SqliteCursor {
    columns: Vec<String>,
    types: Vec<String>,
    rows: VecDeque<Result<Vec<CellValue>, DriverError>>,
    current: Option<Result<Vec<CellValue>, DriverError>>,
    terminal: Option<DriverError>,
    open: bool,
}

impl RowCursor for SqliteCursor {
    fn columns(&self) -> Result<Vec<String>, DriverError> {
        Ok(self.columns.clone())
    }

    fn column_types(&self) -> Result<Vec<String>, DriverError> {
        Ok(self.types.clone())
    }

    fn next_row(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.current = self.rows.pop_front();
        self.current.is_some()
    }

    fn scan(&mut self) -> Result<Vec<CellValue>, DriverError> {
        self.current
            .take()
            .unwrap_or_else(|| Err(DriverError::Message("scan called without a current row".to_string())))
    }

    fn terminal_error(&mut self) -> Option<DriverError> {
        self.terminal.take()
    }

    fn close(&mut self) {
        self.open = false;
        self.rows.clear();
        self.current = None;
    }
}

fn decode_row(row: &rusqlite::Row<'_>, types: &[String]) -> Result<Vec<CellValue>, DriverError> {
    types
        .iter()
        .enumerate()
        .map(|(column, type_name)| decode_value(row.get_ref(column)?, type_name, column))
        .collect()
}

fn decode_value(value: ValueRef<'_>, type_name: &str, column: usize) -> Result<CellValue, DriverError> {
    let temporal = declares_any(type_name, &["DATE", "DATETIME", "TIMESTAMP"]);

    match value {
        ValueRef::Null => Ok(CellValue::Null),
        ValueRef::Integer(i) if declares_any(type_name, &["BOOLEAN", "BOOL"]) => {
            Ok(CellValue::Bool(i != 0))
        }
        ValueRef::Integer(i) if temporal => Ok(DateTime::from_timestamp(i, 0)
            .map(|dt| CellValue::Timestamp(dt.naive_utc()))
            .unwrap_or(CellValue::Integer(i))),
        ValueRef::Integer(i) => Ok(CellValue::Integer(i)),
        ValueRef::Real(f) => Ok(CellValue::Float(f)),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|e| DriverError::Conversion {
                column,
                message: e.to_string(),
            })?;
            if temporal {
                if let Some(ts) = parse_timestamp(text) {
                    return Ok(CellValue::Timestamp(ts));
                }
            }
            Ok(CellValue::Text(text.to_string()))
        }
        ValueRef::Blob(bytes) => Ok(CellValue::Bytes(bytes.to_vec())),
    }
}

/// Whether a declared type name contains one of the given words
fn declares_any(type_name: &str, words: &[&str]) -> bool {
    type_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|w| words.contains(&w))
}

/// Parse the timestamp layouts SQLite applications commonly store
fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for layout in TIMESTAMP_LAYOUTS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Some(ts);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            CellValue::Null => ToSqlOutput::Owned(Value::Null),
            CellValue::Bool(b) => ToSqlOutput::Owned(Value::Integer(i64::from(*b))),
            CellValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            CellValue::Float(f) => ToSqlOutput::Owned(Value::Real(*f)),
            CellValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            CellValue::Timestamp(ts) => {
                ToSqlOutput::Owned(Value::Text(ts.format(BIND_DATETIME_FORMAT).to_string()))
            }
            CellValue::Bytes(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}
