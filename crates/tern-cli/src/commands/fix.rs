//! Fix command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::{load_settings, open_migrator, print_table};

/// Execute the fix command
pub(crate) fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let migrator = open_migrator(&settings, args.dry_run, false)?;
    let report = migrator
        .fix()
        .context("Failed to renumber migrations")?;

    if report.renumbered.is_empty() {
        println!("Nothing to renumber");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = report
        .renumbered
        .iter()
        .map(|r| {
            vec![
                r.old_version.to_string(),
                r.new_version.to_string(),
                r.to.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["OLD VERSION", "NEW VERSION", "FILE"], &rows);

    println!();
    if report.dry_run {
        println!("Dry run: no files or ledger rows were changed");
    } else {
        println!(
            "Renumbered {} migration(s), rewrote {} ledger row(s)",
            report.renumbered.len(),
            report.ledger_rows
        );
    }
    Ok(())
}
