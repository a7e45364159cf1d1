//! Result table builder: drains a cursor into a fully materialized table

use crate::config::Strictness;
use crate::driver::RowCursor;
use crate::error::{DriverError, Error, Result};
use crate::model::{CellValue, Table, ValueTable};
use crate::normalize::Normalizer;

/// Build a string table, normalizing every cell by its column's declared type.
///
/// The cursor is closed before returning, on success and on failure.
pub fn build_table(cursor: &mut dyn RowCursor, normalizer: &Normalizer) -> Result<Table> {
    let result = drain(cursor, |row, types, values| {
        let mut out = Vec::with_capacity(values.len());
        for (column, (value, type_name)) in values.iter().zip(types).enumerate() {
            if normalizer.strictness() == Strictness::Raw && value.is_null() {
                return Err(Error::Scan {
                    row,
                    source: DriverError::Conversion {
                        column,
                        message: "converting NULL to string is unsupported".to_string(),
                    },
                });
            }
            out.push(normalizer.normalize(type_name, value));
        }
        Ok(out)
    });
    cursor.close();

    let (header, rows) = result?;
    let mut table = Table::new(header);
    for row in rows {
        table.add_row(row);
    }
    Ok(table)
}

/// Build a table that keeps the decoded values
pub fn build_value_table(cursor: &mut dyn RowCursor) -> Result<ValueTable> {
    let result = drain(cursor, |_, _, values| Ok(values));
    cursor.close();

    let (header, rows) = result?;
    let mut table = ValueTable::new(header);
    for row in rows {
        table.add_row(row);
    }
    Ok(table)
}

/// Read the first column of the first row.
///
/// Fails with [`Error::NotFound`] when the query produced no rows.
pub fn first_value(cursor: &mut dyn RowCursor) -> Result<CellValue> {
    let result = read_first(cursor);
    cursor.close();
    result
}

fn read_first(cursor: &mut dyn RowCursor) -> Result<CellValue> {
    if !cursor.next_row() {
        if let Some(err) = cursor.terminal_error() {
            return Err(Error::Cursor(err));
        }
        return Err(Error::NotFound);
    }

    let values = cursor
        .scan()
        .map_err(|source| Error::Scan { row: 1, source })?;
    values
        .into_iter()
        .next()
        .ok_or_else(|| Error::InvalidShape("query returned no columns".to_string()))
}

type Drained<T> = (Vec<String>, Vec<Vec<T>>);

/// Walk the cursor to the end, converting each scanned row with `convert`.
///
/// `convert` receives the 1-based row number, the declared column types and the
/// scanned values. Any failure discards everything read so far.
fn drain<T, F>(cursor: &mut dyn RowCursor, mut convert: F) -> Result<Drained<T>>
where
    F: FnMut(usize, &[String], Vec<CellValue>) -> Result<Vec<T>>,
{
    let header = cursor.columns().map_err(Error::Columns)?;
    let types = cursor.column_types().map_err(Error::ColumnTypes)?;
    if types.len() != header.len() {
        return Err(Error::ColumnTypes(DriverError::Message(format!(
            "{} type names for {} columns",
            types.len(),
            header.len()
        ))));
    }

    let mut rows = Vec::new();
    let mut row_number = 0;

    while cursor.next_row() {
        row_number += 1;

        let values = cursor.scan().map_err(|source| Error::Scan {
            row: row_number,
            source,
        })?;

        if values.len() != header.len() {
            return Err(Error::Scan {
                row: row_number,
                source: DriverError::Message(format!(
                    "expected {} values, got {}",
                    header.len(),
                    values.len()
                )),
            });
        }

        rows.push(convert(row_number, &types, values)?);
    }

    if let Some(err) = cursor.terminal_error() {
        return Err(Error::Cursor(err));
    }

    tracing::debug!(columns = header.len(), rows = rows.len(), "result set read");
    Ok((header, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{MockConnection, Script};
    use crate::driver::Connection;

    fn people() -> Script {
        Script::new(&["id", "score", "name"], &["NUMBER", "DOUBLE", "VARCHAR2"])
            .row(vec![CellValue::Integer(1), CellValue::Float(2.0000005), "ann".into()])
            .row(vec![CellValue::Integer(2), CellValue::Null, CellValue::Null])
    }

    fn build(conn: &MockConnection, normalizer: &Normalizer) -> Result<Table> {
        let mut cursor = conn.query("SELECT", &[]).unwrap();
        build_table(cursor.as_mut(), normalizer)
    }

    #[test]
    fn test_build_typed_table() {
        let conn = MockConnection::new(people());
        let table = build(&conn, &Normalizer::default()).unwrap();

        assert_eq!(table.header, vec!["id", "score", "name"]);
        assert_eq!(table.rows[0], vec!["1", "2.000001", "ann"]);
        assert_eq!(table.rows[1], vec!["2", "", ""]);
        assert_eq!(conn.closed_cursors.get(), 1);
    }

    #[test]
    fn test_header_present_without_rows() {
        let conn = MockConnection::new(Script::new(&["a", "b"], &["TEXT", "TEXT"]));
        let table = build(&conn, &Normalizer::default()).unwrap();

        assert_eq!(table.header, vec!["a", "b"]);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_scan_failure_discards_table() {
        let script = people().bad_row("connection reset");
        let conn = MockConnection::new(script);
        let err = build(&conn, &Normalizer::default()).unwrap_err();

        assert!(matches!(err, Error::Scan { row: 3, .. }));
        assert_eq!(conn.closed_cursors.get(), 1);
    }

    #[test]
    fn test_terminal_error_is_not_zero_rows() {
        let conn = MockConnection::new(people().terminal("protocol error"));
        let err = build(&conn, &Normalizer::default()).unwrap_err();

        assert!(matches!(err, Error::Cursor(_)));
        assert!(err.to_string().contains("protocol error"));
        assert_eq!(conn.closed_cursors.get(), 1);
    }

    #[test]
    fn test_width_mismatch_is_scan_failure() {
        let script = Script::new(&["a", "b"], &["TEXT", "TEXT"]).row(vec!["only".into()]);
        let conn = MockConnection::new(script);
        let err = build(&conn, &Normalizer::default()).unwrap_err();

        assert!(matches!(err, Error::Scan { row: 1, .. }));
    }

    #[test]
    fn test_type_names_must_match_columns() {
        let script = Script::new(&["a", "b"], &["TEXT"]).row(vec!["x".into(), "y".into()]);
        let conn = MockConnection::new(script);
        let err = build(&conn, &Normalizer::default()).unwrap_err();

        assert!(matches!(err, Error::ColumnTypes(_)));
        assert_eq!(conn.closed_cursors.get(), 1);

        let mut cursor = conn.query("SELECT", &[]).unwrap();
        assert!(matches!(
            build_value_table(cursor.as_mut()),
            Err(Error::ColumnTypes(_))
        ));
    }

    #[test]
    fn test_raw_tier_rejects_null() {
        let conn = MockConnection::new(people());
        let raw = Normalizer::default().with_strictness(Strictness::Raw);
        let err = build(&conn, &raw).unwrap_err();

        assert!(matches!(err, Error::Scan { row: 2, .. }));
        assert_eq!(conn.closed_cursors.get(), 1);
    }

    #[test]
    fn test_generic_tier_keeps_values_as_is() {
        let conn = MockConnection::new(people());
        let generic = Normalizer::default().with_strictness(Strictness::Generic);
        let table = build(&conn, &generic).unwrap();

        assert_eq!(table.rows[0], vec!["1", "2.0000005", "ann"]);
        assert_eq!(table.rows[1], vec!["2", "", ""]);
    }

    #[test]
    fn test_value_table_keeps_cells() {
        let conn = MockConnection::new(people());
        let mut cursor = conn.query("SELECT", &[]).unwrap();
        let table = build_value_table(cursor.as_mut()).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1][1], CellValue::Null);
        assert_eq!(table.column_index("name"), Some(2));
    }

    #[test]
    fn test_first_value() {
        let conn = MockConnection::new(people());
        let mut cursor = conn.query("SELECT", &[]).unwrap();
        assert_eq!(first_value(cursor.as_mut()).unwrap(), CellValue::Integer(1));
        assert_eq!(conn.closed_cursors.get(), 1);

        let empty = MockConnection::new(Script::new(&["n"], &["INT"]));
        let mut cursor = empty.query("SELECT", &[]).unwrap();
        assert!(matches!(first_value(cursor.as_mut()), Err(Error::NotFound)));
    }
}
