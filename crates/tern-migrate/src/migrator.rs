//! Command entry points.
//!
//! [`Migrator`] ties discovery, planning and execution together for one
//! database and one migrations directory. Each call re-reads the directory
//! and the ledger; nothing is cached between commands.

use crate::collection::Migrations;
use crate::error::MigrateResult;
use crate::executor::Executor;
use crate::fix::{apply_fix, next_sequential_version, plan_fix, FixReport};
use crate::plan::{plan_down, plan_redo, plan_up, DownLimit, Plan, StepAction, UpLimit};
use crate::registry::MigrationRegistry;
use crate::source::collect_migrations;
use crate::status::StatusReport;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tern_core::naming::PROGRAMMATIC_EXTENSION;
use tern_core::template::create_migration_file;
use tern_core::version::{sequential_token, timestamp_version_now};
use tern_core::{MigrationKind, MAX_VERSION, MIN_VERSION};
use tern_db::{LedgerState, LedgerStore, MigrationDb};

/// Per-invocation settings.
#[derive(Debug, Clone)]
pub struct MigratorOptions {
    /// Directory scanned for migration files
    pub dir: PathBuf,
    /// Ledger table name
    pub table: String,
    /// Apply unapplied migrations below the current version instead of failing
    pub include_missing: bool,
    /// Plan and report without touching the database
    pub dry_run: bool,
}

impl MigratorOptions {
    pub fn new(dir: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            table: table.into(),
            include_missing: false,
            dry_run: false,
        }
    }

    pub fn include_missing(mut self, include_missing: bool) -> Self {
        self.include_missing = include_missing;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// The command surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Up,
    UpByOne,
    UpTo(i64),
    Down,
    DownTo(i64),
    Redo,
    Reset,
    Status { unapplied_only: bool },
    Version,
    Create {
        name: String,
        kind: MigrationKind,
        sequential: bool,
    },
    Fix,
}

/// One migration touched by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunEntry {
    pub version: i64,
    pub source: String,
}

/// What an up/down-series did, or would do in a dry run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub from_version: i64,
    /// Current version afterwards; equal to `from_version` in a dry run
    pub to_version: i64,
    pub applied: Vec<RunEntry>,
    pub rolled_back: Vec<RunEntry>,
    /// Already applied according to the ledger
    pub skipped: Vec<RunEntry>,
}

impl RunReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.rolled_back.is_empty() && self.skipped.is_empty()
    }

    pub fn applied_versions(&self) -> Vec<i64> {
        self.applied.iter().map(|e| e.version).collect()
    }

    pub fn rolled_back_versions(&self) -> Vec<i64> {
        self.rolled_back.iter().map(|e| e.version).collect()
    }

    pub fn skipped_versions(&self) -> Vec<i64> {
        self.skipped.iter().map(|e| e.version).collect()
    }
}

/// Result of [`Migrator::run`].
#[derive(Debug, Clone)]
pub enum CommandOutcome {
    Run(RunReport),
    Status(StatusReport),
    Version(i64),
    Fix(FixReport),
    Created(PathBuf),
}

pub struct Migrator {
    db: MigrationDb,
    ledger: LedgerStore,
    options: MigratorOptions,
    registry: MigrationRegistry,
}

impl Migrator {
    pub fn new(db: MigrationDb, options: MigratorOptions, registry: MigrationRegistry) -> Self {
        let ledger = LedgerStore::for_db(&db, options.table.clone());
        Self {
            db,
            ledger,
            options,
            registry,
        }
    }

    pub fn db(&self) -> &MigrationDb {
        &self.db
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn options(&self) -> &MigratorOptions {
        &self.options
    }

    pub fn dir(&self) -> &Path {
        &self.options.dir
    }

    /// Dispatch one command.
    pub fn run(&self, command: Command) -> MigrateResult<CommandOutcome> {
        log::debug!("Running {command:?} against {}", self.dir().display());
        Ok(match command {
            Command::Up => CommandOutcome::Run(self.up()?),
            Command::UpByOne => CommandOutcome::Run(self.up_by_one()?),
            Command::UpTo(version) => CommandOutcome::Run(self.up_to(version)?),
            Command::Down => CommandOutcome::Run(self.down()?),
            Command::DownTo(version) => CommandOutcome::Run(self.down_to(version)?),
            Command::Redo => CommandOutcome::Run(self.redo()?),
            Command::Reset => CommandOutcome::Run(self.reset()?),
            Command::Status { unapplied_only } => {
                CommandOutcome::Status(self.status(unapplied_only)?)
            }
            Command::Version => CommandOutcome::Version(self.version()?),
            Command::Create {
                name,
                kind,
                sequential,
            } => CommandOutcome::Created(self.create(&name, kind, sequential)?),
            Command::Fix => CommandOutcome::Fix(self.fix()?),
        })
    }

    /// Every migration in the directory.
    pub fn collect(&self) -> MigrateResult<Migrations> {
        collect_migrations(&self.options.dir, MIN_VERSION, MAX_VERSION, &self.registry)
    }

    /// Ledger snapshot; dry runs read without creating the table.
    fn ledger_state(&self) -> MigrateResult<LedgerState> {
        if self.options.dry_run {
            Ok(self.ledger.peek_state(self.db.conn())?)
        } else {
            Ok(self.ledger.applied_set(&self.db)?)
        }
    }

    /// Apply every pending migration.
    pub fn up(&self) -> MigrateResult<RunReport> {
        self.run_up(UpLimit::All)
    }

    /// Apply the next pending migration.
    pub fn up_by_one(&self) -> MigrateResult<RunReport> {
        self.run_up(UpLimit::One)
    }

    /// Apply pending migrations up to and including `version`.
    pub fn up_to(&self, version: i64) -> MigrateResult<RunReport> {
        self.run_up(UpLimit::To(version))
    }

    fn run_up(&self, limit: UpLimit) -> MigrateResult<RunReport> {
        let migrations = self.collect()?;
        let state = self.ledger_state()?;
        let plan = plan_up(&migrations, &state, self.options.include_missing, limit)?;
        let report = self.execute(&plan)?;

        if report.applied.is_empty() {
            log::info!("No migrations to run. Current version: {}", report.to_version);
        } else if !report.dry_run {
            log::info!(
                "Successfully migrated database to version: {}",
                report.to_version
            );
        }
        Ok(report)
    }

    /// Roll back the current version.
    pub fn down(&self) -> MigrateResult<RunReport> {
        self.run_down(DownLimit::One)
    }

    /// Roll back every applied version above `version`.
    pub fn down_to(&self, version: i64) -> MigrateResult<RunReport> {
        self.run_down(DownLimit::To(version))
    }

    /// Roll back every applied version.
    pub fn reset(&self) -> MigrateResult<RunReport> {
        self.run_down(DownLimit::To(tern_core::SENTINEL_VERSION))
    }

    fn run_down(&self, limit: DownLimit) -> MigrateResult<RunReport> {
        let migrations = self.collect()?;
        let state = self.ledger_state()?;
        let plan = plan_down(&migrations, &state, limit)?;
        let report = self.execute(&plan)?;

        if report.rolled_back.is_empty() {
            log::info!(
                "No migrations to roll back. Current version: {}",
                report.to_version
            );
        }
        Ok(report)
    }

    /// Roll back and reapply the current version.
    pub fn redo(&self) -> MigrateResult<RunReport> {
        let migrations = self.collect()?;
        let state = self.ledger_state()?;
        let plan = plan_redo(&migrations, &state)?;
        if plan.is_empty() {
            log::info!("No migration to redo. Current version: {}", plan.from_version);
        }
        self.execute(&plan)
    }

    /// Execute `plan` step by step, stopping at the first failure.
    fn execute(&self, plan: &Plan) -> MigrateResult<RunReport> {
        let executor = Executor::new(&self.db, &self.ledger, self.options.dry_run);
        let mut report = RunReport {
            dry_run: self.options.dry_run,
            from_version: plan.from_version,
            to_version: plan.from_version,
            ..RunReport::default()
        };

        for step in &plan.steps {
            let migration = &step.migration;
            let entry = RunEntry {
                version: migration.version,
                source: migration.name(),
            };
            match step.action {
                StepAction::Apply => {
                    executor.apply_up(migration)?;
                    report.applied.push(entry);
                }
                StepAction::Rollback => {
                    executor.apply_down(migration)?;
                    report.rolled_back.push(entry);
                }
                StepAction::Skip => {
                    log::warn!(
                        "Skipping {}: already applied according to the ledger",
                        migration.name()
                    );
                    report.skipped.push(entry);
                }
            }
        }

        if !self.options.dry_run && !plan.is_empty() {
            report.to_version = self.ledger.current_version(&self.db)?;
        }
        Ok(report)
    }

    /// Every migration with its ledger state.
    pub fn status(&self, unapplied_only: bool) -> MigrateResult<StatusReport> {
        let migrations = self.collect()?;
        let state = self.ledger_state()?;
        Ok(StatusReport::build(&migrations, &state, unapplied_only))
    }

    /// Current version from the ledger.
    pub fn version(&self) -> MigrateResult<i64> {
        Ok(self.ledger_state()?.current_version())
    }

    /// Write a new migration file and return its path.
    ///
    /// Timestamped by default; `sequential` takes the slot after the highest
    /// sequential version on disk.
    pub fn create(&self, name: &str, kind: MigrationKind, sequential: bool) -> MigrateResult<PathBuf> {
        let token = if sequential {
            sequential_token(self.next_sequential_version()?)
        } else {
            timestamp_version_now()
        };
        let path = create_migration_file(&self.options.dir, &token, name, kind)?;
        log::info!("Created new file: {}", path.display());
        Ok(path)
    }

    fn next_sequential_version(&self) -> MigrateResult<i64> {
        if !self.options.dir.exists() {
            return Ok(MIN_VERSION);
        }
        next_sequential_version(&self.collect()?)
    }

    /// Renumber timestamped migrations into sequential versions.
    pub fn fix(&self) -> MigrateResult<FixReport> {
        let migrations = self.collect()?;
        let renumbered = plan_fix(&migrations)?;

        if renumbered.is_empty() {
            log::info!("No timestamped migrations to renumber");
        }
        if self.options.dry_run {
            for step in &renumbered {
                log::info!(
                    "DRY RUN  would rename {} -> {}",
                    step.from.display(),
                    step.to.display()
                );
            }
            return Ok(FixReport {
                dry_run: true,
                renumbered,
                ledger_rows: 0,
            });
        }

        self.ledger.ensure_initialized(&self.db)?;
        let ledger_rows = apply_fix(&self.db, &self.ledger, &renumbered)?;
        if renumbered
            .iter()
            .any(|r| r.from.extension().is_some_and(|e| e == PROGRAMMATIC_EXTENSION))
        {
            log::warn!(
                "Programmatic migrations were renumbered; register their functions under the new versions"
            );
        }
        Ok(FixReport {
            dry_run: false,
            renumbered,
            ledger_rows,
        })
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
