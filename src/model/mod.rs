//! Data model for query results

mod schema;
mod table;

pub use schema::{CellKind, TypeCategory};
pub use table::{CellValue, Table, ValueTable, DEFAULT_DATETIME_FORMAT};
