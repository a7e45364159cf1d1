//! sqltable - SQL queries as normalized string tables
//!
//! A thin layer over a SQL driver: open a connection, run statements, and read
//! query results back as fully materialized tables of display strings. Each cell
//! is normalized according to its column's declared database type, so numbers,
//! dates and NULLs render consistently regardless of how the driver decoded them.

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod escape;
pub mod model;
pub mod normalize;
pub mod output;
pub mod reshape;

pub use client::{
    close, connect, connect_no_ping, execute, query, query_keyed_map, query_keyed_map_list,
    query_map_list, query_scalar_float, query_scalar_float_with, query_scalar_int,
    query_scalar_string, query_values, query_with, ExecResult,
};
pub use config::{Config, NormalizeConfig, OutputFormat, Strictness};
pub use driver::{Connection, Driver, DriverRegistry};
pub use error::{DriverError, Error, Result};
pub use escape::{escape_literal, escape_literal_controls};
pub use model::{CellValue, Table, ValueTable};
pub use normalize::Normalizer;
pub use reshape::Record;
