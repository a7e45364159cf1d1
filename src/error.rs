//! Error types

/// Failure reported by a driver
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("column {column}: {message}")]
    Conversion { column: usize, message: String },

    #[error("{0}")]
    Message(String),
}

/// Failure of a client operation, tagged with the operation that failed
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open DB ({driver}): {source}")]
    Open { driver: String, source: DriverError },

    #[error("failed to ping DB: {0}")]
    Ping(#[source] DriverError),

    #[error("failed to exec: {0}")]
    Exec(#[source] DriverError),

    #[error("failed to run query: {0}")]
    Query(#[source] DriverError),

    #[error("failed to get columns: {0}")]
    Columns(#[source] DriverError),

    #[error("failed to get column types: {0}")]
    ColumnTypes(#[source] DriverError),

    #[error("failed to scan row {row}: {source}")]
    Scan { row: usize, source: DriverError },

    #[error("error occurred while enumerating the result set: {0}")]
    Cursor(#[source] DriverError),

    #[error("record not found")]
    NotFound,

    #[error("invalid result shape: {0}")]
    InvalidShape(String),

    #[error("failed to close DB: {0}")]
    Close(#[source] DriverError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
