use super::*;
use crate::registry::MigrationRegistry;
use crate::source::collect_migrations;
use tempfile::TempDir;
use tern_core::{MAX_VERSION, MIN_VERSION};

const UP_ONLY: &str = "-- +tern Up\nSELECT 1;\n";

fn write(dir: &TempDir, name: &str) {
    std::fs::write(dir.path().join(name), UP_ONLY).unwrap();
}

fn collect(dir: &TempDir) -> Migrations {
    collect_migrations(dir.path(), MIN_VERSION, MAX_VERSION, &MigrationRegistry::new()).unwrap()
}

#[test]
fn test_plan_starts_at_one_without_sequential_migrations() {
    let dir = TempDir::new().unwrap();
    write(&dir, "20230102000000_b.sql");
    write(&dir, "20230101000000_a.sql");

    let plan = plan_fix(&collect(&dir)).unwrap();
    let pairs: Vec<(i64, i64)> = plan.iter().map(|r| (r.old_version, r.new_version)).collect();
    assert_eq!(pairs, vec![(20230101000000, 1), (20230102000000, 2)]);
    assert_eq!(plan[0].to, dir.path().join("00001_a.sql"));
    assert_eq!(plan[1].to, dir.path().join("00002_b.sql"));
}

#[test]
fn test_plan_continues_after_last_sequential() {
    let dir = TempDir::new().unwrap();
    write(&dir, "00001_a.sql");
    write(&dir, "00002_b.sql");
    write(&dir, "20230101000000_c.sql");

    let plan = plan_fix(&collect(&dir)).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].new_version, 3);
    assert_eq!(plan[0].to, dir.path().join("00003_c.sql"));
}

#[test]
fn test_plan_without_timestamped_is_empty() {
    let dir = TempDir::new().unwrap();
    write(&dir, "00001_a.sql");
    assert!(plan_fix(&collect(&dir)).unwrap().is_empty());
}

#[test]
fn test_plan_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    write(&dir, "20230101000000_a.sql");
    // Not a migration name, but it occupies the target path.
    std::fs::create_dir(dir.path().join("00001_a.sql")).unwrap();

    let err = plan_fix(&collect(&dir)).unwrap_err();
    assert!(matches!(
        err,
        MigrateError::Core(CoreError::MigrationExists { .. })
    ));
}

#[test]
fn test_apply_renames_files_and_rewrites_ledger() {
    let dir = TempDir::new().unwrap();
    write(&dir, "20230101000000_a.sql");
    write(&dir, "20230102000000_b.sql");

    let db = MigrationDb::open_memory().unwrap();
    let ledger = LedgerStore::for_db(&db, "tern_db_version");
    ledger.ensure_initialized(&db).unwrap();
    db.transaction(|conn| ledger.record_transition(conn, 20230101000000, true))
        .unwrap();

    let plan = plan_fix(&collect(&dir)).unwrap();
    let rows = apply_fix(&db, &ledger, &plan).unwrap();
    assert_eq!(rows, 1);

    assert!(dir.path().join("00001_a.sql").exists());
    assert!(dir.path().join("00002_b.sql").exists());
    assert!(!dir.path().join("20230101000000_a.sql").exists());

    let state = ledger.read_state(db.conn()).unwrap();
    assert!(state.is_applied(1));
    assert!(state.get(20230101000000).is_none());
    assert_eq!(collect(&dir).versions(), vec![1, 2]);
}

#[test]
fn test_failed_rename_reverts_earlier_renames_and_ledger() {
    let dir = TempDir::new().unwrap();
    write(&dir, "20230101000000_a.sql");
    write(&dir, "20230102000000_b.sql");

    let db = MigrationDb::open_memory().unwrap();
    let ledger = LedgerStore::for_db(&db, "tern_db_version");
    ledger.ensure_initialized(&db).unwrap();
    db.transaction(|conn| ledger.record_transition(conn, 20230101000000, true))
        .unwrap();

    let mut plan = plan_fix(&collect(&dir)).unwrap();
    // Point the second rename at a directory that does not exist.
    plan[1].to = dir.path().join("missing").join("00002_b.sql");

    let err = apply_fix(&db, &ledger, &plan).unwrap_err();
    assert!(matches!(err, MigrateError::Rename { .. }));

    assert!(dir.path().join("20230101000000_a.sql").exists());
    assert!(dir.path().join("20230102000000_b.sql").exists());
    assert!(!dir.path().join("00001_a.sql").exists());

    let state = ledger.read_state(db.conn()).unwrap();
    assert!(state.is_applied(20230101000000));
    assert!(state.get(1).is_none());
}

#[test]
fn test_next_sequential_version() {
    let dir = TempDir::new().unwrap();
    assert_eq!(next_sequential_version(&collect(&dir)).unwrap(), 1);

    write(&dir, "00004_d.sql");
    write(&dir, "20230101000000_a.sql");
    assert_eq!(next_sequential_version(&collect(&dir)).unwrap(), 5);
}

#[test]
fn test_plan_errors_when_sequential_versions_are_exhausted() {
    let dir = TempDir::new().unwrap();
    write(&dir, "9223372036854775807_max.sql");
    write(&dir, "20230101000000_a.sql");

    let err = plan_fix(&collect(&dir)).unwrap_err();
    assert!(matches!(
        err,
        MigrateError::NoSequentialSlot { after: i64::MAX }
    ));
}

#[test]
fn test_plan_errors_when_slots_run_out_midway() {
    let dir = TempDir::new().unwrap();
    write(&dir, "9223372036854775806_almost.sql");
    write(&dir, "20230101000000_a.sql");
    write(&dir, "20230102000000_b.sql");

    let err = plan_fix(&collect(&dir)).unwrap_err();
    assert!(matches!(err, MigrateError::NoSequentialSlot { .. }));
}
