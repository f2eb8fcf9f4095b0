//! Status and version command implementations

use anyhow::{Context, Result};
use tern_migrate::StatusReport;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{load_settings, open_migrator, print_table};

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let migrator = open_migrator(&settings, false, false)?;
    let report = migrator
        .status(args.unapplied_only)
        .context("Failed to read migration status")?;

    match args.output {
        StatusOutput::Table => print_status_table(&report, args.unapplied_only),
        StatusOutput::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn print_status_table(report: &StatusReport, unapplied_only: bool) {
    if report.entries.is_empty() {
        if unapplied_only {
            println!("No unapplied migrations");
        } else {
            println!("No migrations");
        }
        println!("Current version: {}", report.current_version);
        return;
    }

    let rows: Vec<Vec<String>> = report
        .entries
        .iter()
        .map(|e| {
            vec![
                e.state.to_string(),
                e.version.to_string(),
                e.kind.to_string(),
                e.source.clone(),
            ]
        })
        .collect();
    print_table(&["APPLIED AT", "VERSION", "KIND", "MIGRATION"], &rows);

    println!();
    println!("Current version: {}", report.current_version);
    let missed = report.missed();
    if !missed.is_empty() {
        println!(
            "{} missed migration(s) below the current version; apply them with `tern up --include-missing`",
            missed.len()
        );
    }
}

/// Execute the version command
pub(crate) fn execute_version(global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let migrator = open_migrator(&settings, false, false)?;
    let version = migrator
        .version()
        .context("Failed to read current version")?;
    println!("{version}");
    Ok(())
}
