use super::*;
use tern_db::MigrationDb;

fn create_widgets(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("CREATE TABLE widgets (id INTEGER)")?;
    Ok(())
}

fn script(up: Option<&str>, down: Option<&str>) -> MigrationBody {
    MigrationBody::Script(ScriptBody {
        up: up.map(String::from),
        down: down.map(String::from),
    })
}

#[test]
fn test_kind_and_scheme() {
    let m = Migration::new(20230101000000, "20230101000000_a.sql", script(Some(""), None));
    assert_eq!(m.kind(), MigrationKind::Script);
    assert_eq!(m.scheme(), VersionScheme::Timestamped);

    let p = Migration::new(
        2,
        "00002_b.rs",
        MigrationBody::Programmatic(RegisteredMigration {
            up: Some(create_widgets),
            down: None,
        }),
    );
    assert_eq!(p.kind(), MigrationKind::Programmatic);
    assert_eq!(p.scheme(), VersionScheme::Sequential);
    assert!(p.has(Direction::Up));
    assert!(!p.has(Direction::Down));
}

#[test]
fn test_script_directions() {
    let m = Migration::new(1, "00001_a.sql", script(Some("SELECT 1;"), None));
    assert!(m.has(Direction::Up));
    assert!(!m.has(Direction::Down));
}

#[test]
fn test_name_is_file_name() {
    let m = Migration::new(1, "/srv/migrations/00001_init.sql", script(Some(""), None));
    assert_eq!(m.name(), "00001_init.sql");
}

#[test]
fn test_run_sql_and_function_transitions() {
    let db = MigrationDb::open_memory().unwrap();

    Transition::Function(create_widgets).run(db.conn()).unwrap();
    Transition::Sql("INSERT INTO widgets VALUES (1);\nINSERT INTO widgets VALUES (2);")
        .run(db.conn())
        .unwrap();

    let count: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM widgets", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_comment_only_sql_is_a_no_op() {
    let db = MigrationDb::open_memory().unwrap();
    Transition::Sql("-- nothing to do here\n\n")
        .run(db.conn())
        .unwrap();
}

#[test]
fn test_failing_sql_returns_db_error() {
    let db = MigrationDb::open_memory().unwrap();
    let result = Transition::Sql("SELECT * FROM missing_table;").run(db.conn());
    assert!(result.is_err());
}

#[test]
fn test_direction_display() {
    assert_eq!(Direction::Up.to_string(), "up");
    assert_eq!(Direction::Down.to_string(), "down");
}
