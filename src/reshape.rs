//! Projections of a result table into maps and lists
//!
//! Every function is pure and returns `None` when the table is too small for the
//! requested shape or a row is not as wide as the header.

use indexmap::IndexMap;

use crate::model::Table;

/// One row as column name → value, in column order
pub type Record = IndexMap<String, String>;

fn to_record(header: &[String], row: &[String]) -> Option<Record> {
    if row.len() != header.len() {
        return None;
    }
    Some(header.iter().cloned().zip(row.iter().cloned()).collect())
}

/// The first data row as a record
pub fn row_map(table: &Table) -> Option<Record> {
    let row = table.rows.first()?;
    to_record(&table.header, row)
}

/// Every data row as a record, in row order
pub fn map_list(table: &Table) -> Option<Vec<Record>> {
    if table.header.is_empty() {
        return None;
    }
    table
        .rows
        .iter()
        .map(|row| to_record(&table.header, row))
        .collect()
}

/// The first column of every data row
pub fn column_list(table: &Table) -> Option<Vec<String>> {
    if table.header.is_empty() {
        return None;
    }
    table
        .rows
        .iter()
        .map(|row| {
            if row.len() != table.header.len() {
                return None;
            }
            row.first().cloned()
        })
        .collect()
}

/// Records keyed by the value of `key`; a later row replaces an earlier one with the same key
pub fn keyed_map(table: &Table, key: &str) -> Option<IndexMap<String, Record>> {
    let key_index = table.column_index(key)?;
    let mut map = IndexMap::with_capacity(table.row_count());
    for row in &table.rows {
        let record = to_record(&table.header, row)?;
        map.insert(row.get(key_index)?.clone(), record);
    }
    Some(map)
}

/// Records grouped by the value of `key`, each group in row order
pub fn keyed_map_list(table: &Table, key: &str) -> Option<IndexMap<String, Vec<Record>>> {
    let key_index = table.column_index(key)?;
    let mut map: IndexMap<String, Vec<Record>> = IndexMap::new();
    for row in &table.rows {
        let record = to_record(&table.header, row)?;
        map.entry(row.get(key_index)?.clone())
            .or_default()
            .push(record);
    }
    Some(map)
}
