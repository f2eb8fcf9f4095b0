use super::*;
use tempfile::TempDir;

#[test]
fn test_defaults_when_fields_missing() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.migrations_dir, "migrations");
    assert_eq!(config.database.path, "tern.duckdb");
    assert_eq!(config.database.dialect, Dialect::DuckDb);
    assert_eq!(config.table, "tern_db_version");
    assert_eq!(config.default_kind, MigrationKind::Script);
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
migrations_dir: db/migrations
database:
  dialect: duckdb
  path: ":memory:"
table: ops.schema_ledger
default_kind: rs
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(config.migrations_dir, "db/migrations");
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.table, "ops.schema_ledger");
    assert_eq!(config.default_kind, MigrationKind::Programmatic);
}

#[test]
fn test_unknown_fields_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("migration_dir: typo\n");
    assert!(result.is_err());
}

#[test]
fn test_invalid_table_names() {
    for table in ["", "1abc", "a.b.c", "drop table x;", "name-with-dash", "a."] {
        let config = Config {
            table: table.to_string(),
            ..Config::default()
        };
        assert!(
            matches!(config.validate(), Err(CoreError::ConfigInvalid { .. })),
            "table {table:?} should be rejected"
        );
    }
}

#[test]
fn test_valid_table_names() {
    for table in ["tern_db_version", "_ledger", "meta.versions"] {
        let config = Config {
            table: table.to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok(), "table {table:?} should be valid");
    }
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tern.yml"), "migrations_dir: a\n").unwrap();
    std::fs::write(dir.path().join("tern.yaml"), "migrations_dir: b\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.migrations_dir, "a");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_or_default_without_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(dir.path()).unwrap();
    assert_eq!(config.table, "tern_db_version");
}

#[test]
fn test_load_or_default_surfaces_parse_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tern.yml"), "table: [unclosed\n").unwrap();
    assert!(matches!(
        Config::load_or_default(dir.path()),
        Err(CoreError::YamlParse(_))
    ));
}

#[test]
fn test_dialect_from_str() {
    assert_eq!("DuckDB".parse::<Dialect>().unwrap(), Dialect::DuckDb);
    assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);
    assert!("oracle".parse::<Dialect>().is_err());
}

#[test]
fn test_migrations_dir_absolute() {
    let config = Config::default();
    let root = Path::new("/srv/app");
    assert_eq!(
        config.migrations_dir_absolute(root),
        PathBuf::from("/srv/app/migrations")
    );
}
