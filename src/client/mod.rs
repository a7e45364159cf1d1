//! Connection, statement and query operations
//!
//! Every operation is a blocking call into the driver. Failures are reported
//! immediately, annotated with the operation that failed; nothing is retried.

pub mod builder;
mod scalar;

use indexmap::IndexMap;

use crate::config::NormalizeConfig;
use crate::driver::{Connection, DriverRegistry};
use crate::error::{Error, Result};
use crate::model::{CellValue, Table, ValueTable};
use crate::normalize::Normalizer;
use crate::reshape::{self, Record};

/// Outcome of [`execute`]; values the driver cannot report are 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub last_insert_id: i64,
    pub rows_affected: i64,
}

impl DriverRegistry {
    /// Open a connection and verify it answers
    pub fn connect(&self, driver: &str, dsn: &str) -> Result<Box<dyn Connection>> {
        let conn = self.connect_no_ping(driver, dsn)?;
        if let Err(err) = conn.ping() {
            if let Err(close_err) = conn.close() {
                tracing::debug!(error = %close_err, "close after failed ping");
            }
            return Err(Error::Ping(err));
        }
        Ok(conn)
    }

    /// Open a connection without checking it
    pub fn connect_no_ping(&self, driver: &str, dsn: &str) -> Result<Box<dyn Connection>> {
        self.open(driver, dsn).map_err(|source| Error::Open {
            driver: driver.to_string(),
            source,
        })
    }
}

/// Open a connection with a built-in driver and verify it answers
pub fn connect(driver: &str, dsn: &str) -> Result<Box<dyn Connection>> {
    DriverRegistry::new().connect(driver, dsn)
}

/// Open a connection with a built-in driver without checking it
pub fn connect_no_ping(driver: &str, dsn: &str) -> Result<Box<dyn Connection>> {
    DriverRegistry::new().connect_no_ping(driver, dsn)
}

/// Close a connection
pub fn close(conn: Box<dyn Connection>) -> Result<()> {
    conn.close().map_err(Error::Close)
}

/// Run a statement that returns no rows
pub fn execute(conn: &dyn Connection, sql: &str, args: &[CellValue]) -> Result<ExecResult> {
    tracing::debug!(sql, args = args.len(), "exec");
    let outcome = conn.exec(sql, args).map_err(Error::Exec)?;

    if outcome.last_insert_id.is_none() {
        tracing::debug!("driver reported no insert id, using 0");
    }

    Ok(ExecResult {
        last_insert_id: outcome.last_insert_id.unwrap_or(0),
        rows_affected: outcome.rows_affected.unwrap_or(0),
    })
}

/// Run a query and normalize every cell by its declared column type
pub fn query(conn: &dyn Connection, sql: &str, args: &[CellValue]) -> Result<Table> {
    query_with(conn, &Normalizer::default(), sql, args)
}

/// Run a query with a specific normalizer
pub fn query_with(
    conn: &dyn Connection,
    normalizer: &Normalizer,
    sql: &str,
    args: &[CellValue],
) -> Result<Table> {
    tracing::debug!(sql, args = args.len(), strictness = ?normalizer.strictness(), "query");
    let mut cursor = conn.query(sql, args).map_err(Error::Query)?;
    builder::build_table(cursor.as_mut(), normalizer)
}

/// Run a query and keep the decoded values
pub fn query_values(conn: &dyn Connection, sql: &str, args: &[CellValue]) -> Result<ValueTable> {
    tracing::debug!(sql, args = args.len(), "query values");
    let mut cursor = conn.query(sql, args).map_err(Error::Query)?;
    builder::build_value_table(cursor.as_mut())
}

fn query_first(conn: &dyn Connection, sql: &str, args: &[CellValue]) -> Result<CellValue> {
    tracing::debug!(sql, args = args.len(), "query scalar");
    let mut cursor = conn.query(sql, args).map_err(Error::Query)?;
    builder::first_value(cursor.as_mut())
}

/// First column of the first row as an integer
pub fn query_scalar_int(conn: &dyn Connection, sql: &str, args: &[CellValue]) -> Result<i64> {
    scalar::to_int(&query_first(conn, sql, args)?)
}

/// First column of the first row as a float rounded to 6 decimals
pub fn query_scalar_float(conn: &dyn Connection, sql: &str, args: &[CellValue]) -> Result<f64> {
    query_scalar_float_with(conn, &NormalizeConfig::default(), sql, args)
}

/// First column of the first row as a float rounded to the configured precision
pub fn query_scalar_float_with(
    conn: &dyn Connection,
    config: &NormalizeConfig,
    sql: &str,
    args: &[CellValue],
) -> Result<f64> {
    let value = query_first(conn, sql, args)?;
    scalar::to_float(&value, &Normalizer::new(config.clone()))
}

/// First column of the first row as a string
pub fn query_scalar_string(conn: &dyn Connection, sql: &str, args: &[CellValue]) -> Result<String> {
    scalar::to_string(&query_first(conn, sql, args)?, &Normalizer::default())
}

fn require_columns(table: Table) -> Result<Table> {
    if table.column_count() == 0 {
        return Err(Error::InvalidShape("query returned no columns".to_string()));
    }
    Ok(table)
}

/// Run a query and return one record per row
pub fn query_map_list(conn: &dyn Connection, sql: &str, args: &[CellValue]) -> Result<Vec<Record>> {
    let table = require_columns(query(conn, sql, args)?)?;
    reshape::map_list(&table)
        .ok_or_else(|| Error::InvalidShape("query returned no columns".to_string()))
}

/// Run a query and key its records by a column; later rows replace earlier ones
pub fn query_keyed_map(
    conn: &dyn Connection,
    sql: &str,
    key: &str,
    args: &[CellValue],
) -> Result<IndexMap<String, Record>> {
    let table = require_columns(query(conn, sql, args)?)?;
    reshape::keyed_map(&table, key).ok_or_else(|| missing_key(key))
}

/// Run a query and group its records by a column
pub fn query_keyed_map_list(
    conn: &dyn Connection,
    sql: &str,
    key: &str,
    args: &[CellValue],
) -> Result<IndexMap<String, Vec<Record>>> {
    let table = require_columns(query(conn, sql, args)?)?;
    reshape::keyed_map_list(&table, key).ok_or_else(|| missing_key(key))
}

fn missing_key(key: &str) -> Error {
    Error::InvalidShape(format!("key column not found: {}", key))
}
