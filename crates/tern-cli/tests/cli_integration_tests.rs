//! End-to-end tests for the `tern` binary.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

// ── Helpers ────────────────────────────────────────────────────────────

fn tern_bin() -> String {
    env!("CARGO_BIN_EXE_tern").to_string()
}

/// Run `tern` in `project` and return (stdout, stderr, success).
fn run_tern(project: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tern_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env_remove("TERN_DIR")
        .env_remove("TERN_DATABASE")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute tern with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn project_with(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let migrations = dir.path().join("migrations");
    std::fs::create_dir_all(&migrations).unwrap();
    for (name, content) in files {
        std::fs::write(migrations.join(name), content).unwrap();
    }
    dir
}

fn table_migration(table: &str) -> String {
    format!("-- +tern Up\nCREATE TABLE {table} (id INTEGER);\n-- +tern Down\nDROP TABLE {table};\n")
}

// ── Tests ──────────────────────────────────────────────────────────────

#[test]
fn test_status_of_empty_project() {
    let project = project_with(&[]);
    let (stdout, stderr, ok) = run_tern(project.path(), &["status"]);
    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("No migrations"));
    assert!(stdout.contains("Current version: 0"));
}

#[test]
fn test_up_status_down_round_trip() {
    let a = table_migration("a");
    let b = table_migration("b");
    let project = project_with(&[("00001_a.sql", &a), ("00002_b.sql", &b)]);

    let (_, stderr, ok) = run_tern(project.path(), &["up"]);
    assert!(ok, "stderr: {stderr}");

    let (stdout, _, ok) = run_tern(project.path(), &["version"]);
    assert!(ok);
    assert_eq!(stdout.trim(), "2");

    let (stdout, _, ok) = run_tern(project.path(), &["status", "--output", "json"]);
    assert!(ok);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["current_version"], 2);
    assert_eq!(report["entries"].as_array().unwrap().len(), 2);
    assert_eq!(report["entries"][0]["state"], "applied");

    let (_, stderr, ok) = run_tern(project.path(), &["down"]);
    assert!(ok, "stderr: {stderr}");
    let (stdout, _, _) = run_tern(project.path(), &["version"]);
    assert_eq!(stdout.trim(), "1");
}

#[test]
fn test_dry_run_does_not_create_database_state() {
    let a = table_migration("a");
    let project = project_with(&[("00001_a.sql", &a)]);

    let (stdout, stderr, ok) = run_tern(project.path(), &["up", "--dry-run"]);
    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("Dry run"));

    let (stdout, _, _) = run_tern(project.path(), &["status", "--unapplied-only"]);
    assert!(stdout.contains("00001_a.sql"));
    assert!(stdout.contains("Pending"));
}

#[test]
fn test_missing_migrations_exit_with_error() {
    let a = table_migration("a");
    let b = table_migration("b");
    let project = project_with(&[("00002_b.sql", &b)]);
    let (_, _, ok) = run_tern(project.path(), &["up"]);
    assert!(ok);

    std::fs::write(project.path().join("migrations/00001_a.sql"), &a).unwrap();
    let (_, stderr, ok) = run_tern(project.path(), &["up"]);
    assert!(!ok);
    assert!(stderr.contains("M006"), "stderr: {stderr}");

    let (_, stderr, ok) = run_tern(project.path(), &["up", "--include-missing"]);
    assert!(ok, "stderr: {stderr}");
}

#[test]
fn test_create_then_fix() {
    let project = project_with(&[]);

    let (stdout, stderr, ok) = run_tern(project.path(), &["create", "add users"]);
    assert!(ok, "stderr: {stderr}");
    let created = stdout.trim().to_string();
    assert!(created.ends_with("_add_users.sql"), "{created}");
    assert!(Path::new(&created).exists());

    let (stdout, stderr, ok) = run_tern(project.path(), &["fix"]);
    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("00001_add_users.sql"));
    assert!(project
        .path()
        .join("migrations/00001_add_users.sql")
        .exists());
}

#[test]
fn test_config_file_is_honoured() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tern.yml"),
        "migrations_dir: db\ntable: schema_history\n",
    )
    .unwrap();
    std::fs::create_dir_all(dir.path().join("db")).unwrap();
    std::fs::write(dir.path().join("db/00001_a.sql"), table_migration("a")).unwrap();

    let (_, stderr, ok) = run_tern(dir.path(), &["up"]);
    assert!(ok, "stderr: {stderr}");
    let (stdout, _, _) = run_tern(dir.path(), &["version"]);
    assert_eq!(stdout.trim(), "1");
}
