//! Transactional execution of single migrations.
//!
//! Each transition runs in its own transaction together with the ledger row
//! that records it, so a failure anywhere leaves both the schema and the
//! ledger as they were before the attempt.

use crate::error::{MigrateError, MigrateResult};
use crate::migration::{Direction, Migration};
use std::time::Instant;
use tern_db::{LedgerStore, MigrationDb};

pub struct Executor<'a> {
    db: &'a MigrationDb,
    ledger: &'a LedgerStore,
    dry_run: bool,
}

impl<'a> Executor<'a> {
    pub fn new(db: &'a MigrationDb, ledger: &'a LedgerStore, dry_run: bool) -> Self {
        Self {
            db,
            ledger,
            dry_run,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run the up body and record the version as applied.
    pub fn apply_up(&self, migration: &Migration) -> MigrateResult<()> {
        self.apply(migration, Direction::Up)
    }

    /// Run the down body and record the version as rolled back.
    pub fn apply_down(&self, migration: &Migration) -> MigrateResult<()> {
        self.apply(migration, Direction::Down)
    }

    fn apply(&self, migration: &Migration, direction: Direction) -> MigrateResult<()> {
        let version = migration.version;
        let transition = migration
            .transition(direction)
            .ok_or_else(|| MigrateError::NoOp {
                version,
                path: migration.source.display().to_string(),
                direction,
            })?;

        if self.dry_run {
            log::info!("DRY RUN  {direction}  {}", migration.name());
            return Ok(());
        }

        let started = Instant::now();
        self.db
            .transaction(|conn| {
                transition
                    .run(conn)
                    .map_err(|source| MigrateError::Execution {
                        version,
                        path: migration.source.display().to_string(),
                        direction,
                        source,
                    })?;
                self.ledger
                    .record_transition(conn, version, direction == Direction::Up)
                    .map_err(|source| MigrateError::Persistence { version, source })
            })
            // BEGIN/COMMIT failures surface as plain database errors
            .map_err(|e| match e {
                MigrateError::Db(source) => MigrateError::Persistence { version, source },
                other => other,
            })?;

        log::info!(
            "OK   {}  {direction}  ({:.2?})",
            migration.name(),
            started.elapsed()
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
