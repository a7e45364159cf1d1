//! Driver layer: the SQL client capability the rest of the crate builds on

mod sqlite;

use crate::error::DriverError;
use crate::model::CellValue;

pub use self::sqlite::{SqliteConnection, SqliteDriver};

/// Outcome of a statement that returns no rows.
///
/// A driver reports `None` for values it cannot provide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub last_insert_id: Option<i64>,
    pub rows_affected: Option<i64>,
}

/// A database driver that can open connections
pub trait Driver: Send + Sync {
    /// Canonical driver name
    fn name(&self) -> &str;

    /// Check if this driver answers to the given name
    fn supports_name(&self, name: &str) -> bool;

    /// Open a connection for a data source
    fn open(&self, dsn: &str) -> Result<Box<dyn Connection>, DriverError>;
}

/// An open database connection
pub trait Connection {
    /// Verify the connection is alive
    fn ping(&self) -> Result<(), DriverError>;

    /// Run a query and return a cursor over its rows
    fn query<'a>(
        &'a self,
        sql: &str,
        args: &[CellValue],
    ) -> Result<Box<dyn RowCursor + 'a>, DriverError>;

    /// Run a statement that returns no rows
    fn exec(&self, sql: &str, args: &[CellValue]) -> Result<ExecOutcome, DriverError>;

    /// Close the connection
    fn close(self: Box<Self>) -> Result<(), DriverError>;
}

/// Forward-only cursor over a query result
pub trait RowCursor {
    /// Column names in result order
    fn columns(&self) -> Result<Vec<String>, DriverError>;

    /// Driver-reported database type name of each column
    fn column_types(&self) -> Result<Vec<String>, DriverError>;

    /// Advance to the next row; false once the rows are exhausted or the cursor failed
    fn next_row(&mut self) -> bool;

    /// Decode the current row
    fn scan(&mut self) -> Result<Vec<CellValue>, DriverError>;

    /// Error that ended the iteration early, if any
    fn terminal_error(&mut self) -> Option<DriverError>;

    /// Release the cursor; further calls to `next_row` return false
    fn close(&mut self);
}

/// Lookup of drivers by name
pub struct DriverRegistry {
    drivers: Vec<Box<dyn Driver>>,
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverRegistry {
    /// Create a registry with all built-in drivers
    pub fn new() -> Self {
        Self {
            drivers: vec![Box::new(SqliteDriver)],
        }
    }

    /// Create a registry with no drivers
    pub fn empty() -> Self {
        Self {
            drivers: Vec::new(),
        }
    }

    /// Add a driver; it takes precedence over drivers registered earlier
    pub fn register(&mut self, driver: Box<dyn Driver>) {
        self.drivers.insert(0, driver);
    }

    /// Get the driver for a name
    pub fn get_driver(&self, name: &str) -> Result<&dyn Driver, DriverError> {
        self.drivers
            .iter()
            .find(|d| d.supports_name(name))
            .map(|d| d.as_ref())
            .ok_or_else(|| DriverError::UnknownDriver(name.to_string()))
    }

    /// Names of the registered drivers
    pub fn names(&self) -> Vec<&str> {
        self.drivers.iter().map(|d| d.name()).collect()
    }

    /// Open a connection with the named driver
    pub fn open(&self, name: &str, dsn: &str) -> Result<Box<dyn Connection>, DriverError> {
        let driver = self.get_driver(name)?;
        driver.open(dsn)
    }
}
