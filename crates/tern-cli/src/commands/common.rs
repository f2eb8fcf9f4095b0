//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tern_core::{Config, DatabaseConfig};
use tern_db::MigrationDb;
use tern_migrate::{Command, CommandOutcome, MigrationRegistry, Migrator, MigratorOptions, RunReport};

use crate::cli::GlobalArgs;

/// Configuration with the global CLI overrides applied.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub config: Config,
    pub migrations_dir: PathBuf,
    pub database: DatabaseConfig,
}

/// Load tern.yml (or defaults) and apply `--dir`, `--database` and `--table`.
///
/// Paths from the config file are relative to the project directory; paths
/// given on the command line are used as-is.
pub(crate) fn load_settings(global: &GlobalArgs) -> Result<Settings> {
    let root = Path::new(&global.project_dir);
    let mut config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_or_default(root),
    }
    .context("Failed to load configuration")?;

    if let Some(table) = &global.table {
        config.table = table.clone();
    }
    config.validate().context("Invalid configuration")?;

    let migrations_dir = match &global.dir {
        Some(dir) => PathBuf::from(dir),
        None => config.migrations_dir_absolute(root),
    };

    let mut database = config.database.clone();
    database.path = match &global.database {
        Some(path) => path.clone(),
        None => resolve_db_path(root, &config.database.path),
    };

    log::debug!(
        "Using migrations in {} and database {} ({})",
        migrations_dir.display(),
        database.path,
        database.dialect
    );

    Ok(Settings {
        config,
        migrations_dir,
        database,
    })
}

fn resolve_db_path(root: &Path, path: &str) -> String {
    if path == ":memory:" || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

/// Open the configured database and build a migrator over it.
///
/// The stock binary has no compiled-in programmatic migrations, so the
/// registry is empty; `.rs` migrations need a binary that registers them.
pub(crate) fn open_migrator(
    settings: &Settings,
    dry_run: bool,
    include_missing: bool,
) -> Result<Migrator> {
    let db = MigrationDb::from_config(&settings.database)
        .with_context(|| format!("Failed to open database {}", settings.database.path))?;
    let options = MigratorOptions::new(&settings.migrations_dir, settings.config.table.clone())
        .dry_run(dry_run)
        .include_missing(include_missing);
    Ok(Migrator::new(db, options, MigrationRegistry::new()))
}

/// Load settings, open the migrator and run one up/down-series command.
pub(crate) fn run_series(
    global: &GlobalArgs,
    command: Command,
    dry_run: bool,
    include_missing: bool,
) -> Result<()> {
    let settings = load_settings(global)?;
    let migrator = open_migrator(&settings, dry_run, include_missing)?;
    let label = format!("{command:?}");
    match migrator
        .run(command)
        .with_context(|| format!("{label} failed"))?
    {
        CommandOutcome::Run(report) => {
            print_run_report(&report);
            Ok(())
        }
        other => anyhow::bail!("{label} returned an unexpected outcome: {other:?}"),
    }
}

/// Print a summary table of what a run applied, rolled back or skipped.
pub(crate) fn print_run_report(report: &RunReport) {
    if report.is_empty() {
        return;
    }

    let rows: Vec<Vec<String>> = report
        .rolled_back
        .iter()
        .map(|e| ("down", e))
        .chain(report.applied.iter().map(|e| ("up", e)))
        .chain(report.skipped.iter().map(|e| ("skipped", e)))
        .map(|(action, e)| vec![e.version.to_string(), action.to_string(), e.source.clone()])
        .collect();

    println!();
    print_table(&["VERSION", "ACTION", "SOURCE"], &rows);
    println!();
    if report.dry_run {
        println!(
            "Dry run: nothing was changed (current version {})",
            report.from_version
        );
    } else {
        println!(
            "Version {} -> {}",
            report.from_version, report.to_version
        );
    }
}

/// Calculate column widths for a table given headers and row data.
///
/// For each column, returns the maximum width across the header and all
/// row values so that data aligns when printed with left-padding.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Print a formatted table to stdout.
///
/// A left-aligned header row, a separator line of dashes, then each data
/// row. Columns are separated by two spaces.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  ").trim_end());

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  ").trim_end());
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
