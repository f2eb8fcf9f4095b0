use super::*;

#[test]
fn test_duckdb_uses_question_marks() {
    let sql = LedgerSql::new(Dialect::DuckDb, "tern_db_version");
    assert_eq!(
        sql.insert_version(),
        "INSERT INTO tern_db_version (version_id, is_applied) VALUES (?, ?)"
    );
    assert_eq!(
        sql.update_version(),
        "UPDATE tern_db_version SET version_id = ? WHERE version_id = ?"
    );
}

#[test]
fn test_postgres_uses_numbered_placeholders() {
    let sql = LedgerSql::new(Dialect::Postgres, "tern_db_version");
    assert_eq!(
        sql.insert_version(),
        "INSERT INTO tern_db_version (version_id, is_applied) VALUES ($1, $2)"
    );
    assert!(sql.table_exists().ends_with("table_schema = $1 AND table_name = $2"));
    assert!(sql.create_table().contains("BIGSERIAL"));
    assert!(sql.latest_rows().contains("EXTRACT(EPOCH FROM tstamp)"));
}

#[test]
fn test_schema_and_name_defaults() {
    assert_eq!(
        LedgerSql::new(Dialect::DuckDb, "ledger").schema_and_name(),
        ("main", "ledger")
    );
    assert_eq!(
        LedgerSql::new(Dialect::Postgres, "ledger").schema_and_name(),
        ("public", "ledger")
    );
    assert_eq!(
        LedgerSql::new(Dialect::DuckDb, "ops.ledger").schema_and_name(),
        ("ops", "ledger")
    );
}

#[test]
fn test_create_table_includes_schema_when_qualified() {
    let sql = LedgerSql::new(Dialect::DuckDb, "ops.ledger").create_table();
    assert!(sql.starts_with("CREATE SCHEMA IF NOT EXISTS ops;"));
    assert!(sql.contains("CREATE SEQUENCE IF NOT EXISTS ops.ledger_id_seq;"));
    assert!(sql.contains("nextval('ops.ledger_id_seq')"));

    let plain = LedgerSql::new(Dialect::DuckDb, "ledger").create_table();
    assert!(!plain.contains("CREATE SCHEMA"));
}

#[test]
fn test_latest_rows_breaks_ties_by_id() {
    let sql = LedgerSql::new(Dialect::DuckDb, "ledger").latest_rows();
    assert!(sql.contains("ORDER BY tstamp DESC, id DESC"));
    assert!(sql.contains("epoch_us(tstamp)"));
}
