use sqltable::{
    close, connect, escape_literal, execute, query, query_keyed_map, query_map_list,
    query_scalar_float, query_scalar_int, query_scalar_string, query_values, query_with,
    CellValue, Connection, Error, Normalizer, Strictness,
};
use tempfile::TempDir;

// Helper function to create a file-based database with a populated table
fn create_temp_db() -> (Box<dyn Connection>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.db");
    let conn = connect("sqlite", path.to_str().unwrap()).unwrap();
    initialize_schema(conn.as_ref());
    (conn, dir)
}

fn initialize_schema(conn: &dyn Connection) {
    execute(
        conn,
        "CREATE TABLE people (
            id INTEGER PRIMARY KEY,
            name VARCHAR(40) NOT NULL,
            balance NUMBER(10,2),
            ratio DOUBLE,
            born DATE,
            note TEXT
        )",
        &[],
    )
    .unwrap();

    let rows: [[CellValue; 5]; 3] = [
        [
            "Ann".into(),
            CellValue::Float(12.5),
            CellValue::Float(1.23456789),
            "1990-04-01 08:30:00".into(),
            "first".into(),
        ],
        [
            "O'Brien".into(),
            CellValue::Integer(100),
            CellValue::Float(0.5),
            "1985-12-24".into(),
            CellValue::Null,
        ],
        [
            "Cho".into(),
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            "third".into(),
        ],
    ];
    for row in &rows {
        execute(
            conn,
            "INSERT INTO people (name, balance, ratio, born, note) VALUES (?1, ?2, ?3, ?4, ?5)",
            row,
        )
        .unwrap();
    }
}

#[test]
fn test_typed_query_end_to_end() {
    let (conn, _dir) = create_temp_db();

    let table = query(
        conn.as_ref(),
        "SELECT id, name, balance, ratio, born, note FROM people ORDER BY id",
        &[],
    )
    .unwrap();

    assert_eq!(table.header, vec!["id", "name", "balance", "ratio", "born", "note"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(
        table.rows[0],
        vec!["1", "Ann", "12.5", "1.234568", "1990-04-01 08:30:00", "first"]
    );
    assert_eq!(
        table.rows[1],
        vec!["2", "O'Brien", "100", "0.5", "1985-12-24 00:00:00", ""]
    );
    assert_eq!(table.rows[2], vec!["3", "Cho", "", "", "", "third"]);

    close(conn).unwrap();
}

#[test]
fn test_insert_reports_id_and_count() {
    let (conn, _dir) = create_temp_db();

    let inserted = execute(
        conn.as_ref(),
        "INSERT INTO people (name) VALUES (?1)",
        &["Dee".into()],
    )
    .unwrap();
    assert_eq!(inserted.last_insert_id, 4);
    assert_eq!(inserted.rows_affected, 1);

    let updated = execute(conn.as_ref(), "UPDATE people SET note = 'x' WHERE id < 3", &[]).unwrap();
    assert_eq!(updated.rows_affected, 2);
}

#[test]
fn test_scalars() {
    let (conn, _dir) = create_temp_db();
    let conn = conn.as_ref();

    assert_eq!(query_scalar_int(conn, "SELECT count(*) FROM people", &[]).unwrap(), 3);
    assert_eq!(
        query_scalar_float(conn, "SELECT ratio FROM people WHERE id = 1", &[]).unwrap(),
        1.234568
    );
    assert_eq!(
        query_scalar_string(conn, "SELECT name FROM people WHERE id = ?1", &[2i64.into()]).unwrap(),
        "O'Brien"
    );
    assert!(matches!(
        query_scalar_string(conn, "SELECT name FROM people WHERE id = 99", &[]),
        Err(Error::NotFound)
    ));
    assert!(matches!(
        query_scalar_string(conn, "SELECT note FROM people WHERE id = 2", &[]),
        Err(Error::Scan { .. })
    ));
}

#[test]
fn test_header_without_rows() {
    let (conn, _dir) = create_temp_db();
    let table = query(conn.as_ref(), "SELECT id, name FROM people WHERE 0", &[]).unwrap();
    assert_eq!(table.header, vec!["id", "name"]);
    assert_eq!(table.row_count(), 0);
}

#[test]
fn test_strictness_tiers() {
    let (conn, _dir) = create_temp_db();
    let sql = "SELECT ratio FROM people ORDER BY id";

    let generic = Normalizer::default().with_strictness(Strictness::Generic);
    let table = query_with(conn.as_ref(), &generic, sql, &[]).unwrap();
    assert_eq!(table.rows[0], vec!["1.23456789"]);
    assert_eq!(table.rows[2], vec![""]);

    let raw = Normalizer::default().with_strictness(Strictness::Raw);
    assert!(matches!(
        query_with(conn.as_ref(), &raw, sql, &[]),
        Err(Error::Scan { row: 3, .. })
    ));
}

#[test]
fn test_query_values_keeps_types() {
    let (conn, _dir) = create_temp_db();
    let table = query_values(conn.as_ref(), "SELECT id, balance, note FROM people ORDER BY id", &[])
        .unwrap();
    assert_eq!(table.rows[0][0], CellValue::Integer(1));
    assert_eq!(table.rows[0][1], CellValue::Float(12.5));
    assert_eq!(table.rows[1][2], CellValue::Null);
}

#[test]
fn test_reshaped_queries() {
    let (conn, _dir) = create_temp_db();
    let conn = conn.as_ref();

    let records = query_map_list(conn, "SELECT id, name FROM people ORDER BY id", &[]).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2]["name"], "Cho");

    let by_name = query_keyed_map(conn, "SELECT name, born FROM people", "name", &[]).unwrap();
    assert_eq!(by_name["O'Brien"]["born"], "1985-12-24 00:00:00");
}

#[test]
fn test_escaped_literal_round_trips() {
    let (conn, _dir) = create_temp_db();
    let sql = format!(
        "SELECT id FROM people WHERE name = '{}'",
        escape_literal("O'Brien")
    );
    assert_eq!(query_scalar_int(conn.as_ref(), &sql, &[]).unwrap(), 2);
}

#[test]
fn test_bad_sql_is_query_failure() {
    let (conn, _dir) = create_temp_db();
    assert!(matches!(
        query(conn.as_ref(), "SELECT * FROM missing_table", &[]),
        Err(Error::Query(_))
    ));
}
