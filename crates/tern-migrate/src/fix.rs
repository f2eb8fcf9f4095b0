//! Renumbering of timestamped migrations into sequential versions.

use crate::collection::Migrations;
use crate::error::{MigrateError, MigrateResult};
use serde::Serialize;
use std::path::PathBuf;
use tern_core::naming::replace_version_token;
use tern_core::version::sequential_token;
use tern_core::{CoreError, MAX_VERSION, MIN_VERSION};
use tern_db::{LedgerStore, MigrationDb};

/// One planned file rename and ledger rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Renumbering {
    pub old_version: i64,
    pub new_version: i64,
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Outcome of a `fix` command.
#[derive(Debug, Clone, Serialize)]
pub struct FixReport {
    pub dry_run: bool,
    pub renumbered: Vec<Renumbering>,
    /// Ledger rows moved to their new version
    pub ledger_rows: usize,
}

/// The version after the highest sequential migration, or [`MIN_VERSION`]
/// when there is none.
pub fn next_sequential_version(migrations: &Migrations) -> MigrateResult<i64> {
    match migrations.last_sequential() {
        Ok(last) => last
            .version
            .checked_add(1)
            .ok_or(MigrateError::NoSequentialSlot {
                after: last.version,
            }),
        Err(MigrateError::EmptyScheme { .. }) => Ok(MIN_VERSION),
        Err(e) => Err(e),
    }
}

/// Assign the next sequential slots to every timestamped migration.
///
/// Slots start after the highest sequential version, or at 1 when there is
/// none, and follow ascending timestamp order. Fails if a target file
/// already exists.
pub fn plan_fix(migrations: &Migrations) -> MigrateResult<Vec<Renumbering>> {
    let mut next = Some(next_sequential_version(migrations)?);

    let mut plan: Vec<Renumbering> = Vec::new();
    for migration in migrations.timestamped().iter() {
        let new_version = next.ok_or(MigrateError::NoSequentialSlot { after: MAX_VERSION })?;
        next = new_version.checked_add(1);
        let to = replace_version_token(
            &migration.source,
            migration.version,
            &sequential_token(new_version),
        )
        .ok_or_else(|| MigrateError::NotFound {
            what: format!(
                "version token {} in file name {}",
                migration.version,
                migration.source.display()
            ),
        })?;
        if to.exists() {
            return Err(CoreError::MigrationExists {
                path: to.display().to_string(),
            }
            .into());
        }
        plan.push(Renumbering {
            old_version: migration.version,
            new_version,
            from: migration.source.clone(),
            to,
        });
    }
    Ok(plan)
}

/// Rename every file and rewrite its ledger rows inside one transaction.
///
/// If any rename, rewrite or the commit fails, the transaction is rolled back
/// and the renames already made are reverted in reverse order. Returns the
/// number of ledger rows rewritten.
pub fn apply_fix(
    db: &MigrationDb,
    ledger: &LedgerStore,
    plan: &[Renumbering],
) -> MigrateResult<usize> {
    let mut renamed: Vec<&Renumbering> = Vec::new();

    let result = db.transaction(|conn| {
        let mut rows = 0;
        for step in plan {
            std::fs::rename(&step.from, &step.to).map_err(|e| MigrateError::Rename {
                from: step.from.display().to_string(),
                to: step.to.display().to_string(),
                source: e,
            })?;
            renamed.push(step);
            rows += ledger
                .rewrite(conn, step.old_version, step.new_version)
                .map_err(|source| MigrateError::Persistence {
                    version: step.old_version,
                    source,
                })?;
            log::info!(
                "Renumbered {} -> {}",
                step.from.display(),
                step.to.display()
            );
        }
        Ok(rows)
    });

    if result.is_err() {
        for step in renamed.iter().rev() {
            if let Err(e) = std::fs::rename(&step.to, &step.from) {
                log::warn!(
                    "Failed to restore {} from {}: {e}",
                    step.from.display(),
                    step.to.display()
                );
            }
        }
    }
    result
}

#[cfg(test)]
#[path = "fix_test.rs"]
mod tests;
