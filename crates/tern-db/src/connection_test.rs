//! Tests for MigrationDb opening and transactions.

use super::*;

fn count(db: &MigrationDb, sql: &str) -> i64 {
    db.conn()
        .query_row(sql, [], |row| row.get::<_, i64>(0))
        .unwrap()
}

#[test]
fn open_file_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    assert!(!path.exists());
    let _db = MigrationDb::open(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn from_config_memory() {
    let config = DatabaseConfig {
        dialect: Dialect::DuckDb,
        path: ":memory:".to_string(),
    };
    let db = MigrationDb::from_config(&config).unwrap();
    assert_eq!(db.dialect(), Dialect::DuckDb);
    assert_eq!(count(&db, "SELECT 42"), 42);
}

#[test]
fn from_config_postgres_not_implemented() {
    let config = DatabaseConfig {
        dialect: Dialect::Postgres,
        path: "postgres://localhost/app".to_string(),
    };
    let err = MigrationDb::from_config(&config).err().unwrap();
    assert!(matches!(err, DbError::NotImplemented { .. }));
}

#[test]
fn transaction_commits_on_ok() {
    let db = MigrationDb::open_memory().unwrap();
    db.conn().execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    db.transaction(|conn| -> DbResult<()> {
        conn.execute("INSERT INTO t VALUES (1)", [])?;
        Ok(())
    })
    .unwrap();

    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 1);
}

#[test]
fn transaction_rolls_back_on_err() {
    let db = MigrationDb::open_memory().unwrap();
    db.conn().execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    let result = db.transaction(|conn| -> DbResult<()> {
        conn.execute("INSERT INTO t VALUES (1)", [])?;
        Err(DbError::ExecutionError("boom".to_string()))
    });

    assert!(matches!(result, Err(DbError::ExecutionError(msg)) if msg == "boom"));
    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 0);
}

#[test]
fn transaction_rolls_back_ddl() {
    let db = MigrationDb::open_memory().unwrap();

    let result = db.transaction(|conn| -> DbResult<()> {
        conn.execute_batch("CREATE TABLE created_then_undone (id INTEGER)")?;
        Err(DbError::ExecutionError("abort".to_string()))
    });
    assert!(result.is_err());

    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'created_then_undone'"
        ),
        0
    );
}

#[test]
fn transaction_is_usable_after_rollback() {
    let db = MigrationDb::open_memory().unwrap();
    let _ = db.transaction(|_| -> DbResult<()> {
        Err(DbError::ExecutionError("first attempt".to_string()))
    });
    db.transaction(|conn| -> DbResult<()> {
        conn.execute_batch("CREATE TABLE after (id INTEGER)")?;
        Ok(())
    })
    .unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM after"), 0);
}

#[test]
fn duckdb_missing_table_is_classified() {
    let db = MigrationDb::open_memory().unwrap();
    let err: DbError = db
        .conn()
        .execute("SELECT * FROM no_such_table", [])
        .unwrap_err()
        .into();
    assert!(matches!(err, DbError::TableNotFound(_)), "{err}");
}

#[test]
fn duckdb_missing_schema_is_classified() {
    let db = MigrationDb::open_memory().unwrap();
    let err: DbError = db
        .conn()
        .execute("SELECT * FROM no_such_schema.t", [])
        .unwrap_err()
        .into();
    assert!(matches!(err, DbError::TableNotFound(_)), "{err}");
}

#[test]
fn duckdb_syntax_error_is_execution_error() {
    let db = MigrationDb::open_memory().unwrap();
    let err: DbError = db.conn().execute("SELEC 1", []).unwrap_err().into();
    assert!(matches!(err, DbError::ExecutionError(_)), "{err}");
}
