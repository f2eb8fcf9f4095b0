//! Run-set selection.
//!
//! The planner is pure: it takes the discovered migrations and a snapshot of
//! the ledger and returns the ordered steps a command would execute. Nothing
//! here touches the database, so dry runs and real runs share one code path.

use crate::collection::Migrations;
use crate::error::{MigrateError, MigrateResult};
use crate::migration::{Direction, Migration};
use tern_core::{MAX_VERSION, SENTINEL_VERSION};
use tern_db::LedgerState;

/// How far an up-series may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpLimit {
    /// Every eligible migration
    All,
    /// At most one migration
    One,
    /// Migrations up to and including this version
    To(i64),
}

/// How far a down-series may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownLimit {
    /// Only the current version
    One,
    /// Every applied version strictly above this one
    To(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Apply,
    Rollback,
    /// Already applied according to the ledger; reported, not executed
    Skip,
}

#[derive(Debug, Clone)]
pub struct PlanStep {
    pub action: StepAction,
    pub migration: Migration,
}

/// Ordered steps for one command.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Current version when the plan was made
    pub from_version: i64,
    pub steps: Vec<PlanStep>,
}

impl Plan {
    fn new(from_version: i64) -> Self {
        Self {
            from_version,
            steps: Vec::new(),
        }
    }

    fn push(&mut self, action: StepAction, migration: &Migration) {
        self.steps.push(PlanStep {
            action,
            migration: migration.clone(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Versions of the steps with `action`, in execution order.
    pub fn versions(&self, action: StepAction) -> Vec<i64> {
        self.steps
            .iter()
            .filter(|s| s.action == action)
            .map(|s| s.migration.version)
            .collect()
    }
}

/// Plan an up-series.
///
/// Without `include_missing`, any unapplied migration below the current
/// version fails the plan with [`MigrateError::MissingMigrations`]. With it,
/// the run starts at the lowest unapplied version and steps over applied
/// versions in between as [`StepAction::Skip`].
pub fn plan_up(
    migrations: &Migrations,
    state: &LedgerState,
    include_missing: bool,
    limit: UpLimit,
) -> MigrateResult<Plan> {
    let current = state.current_version();
    let unapplied = migrations.unapplied_against(state);
    let above_current = current.saturating_add(1);

    if !include_missing {
        let contiguous = migrations.in_range(above_current, MAX_VERSION);
        if unapplied.len() != contiguous.len() {
            let missing = unapplied
                .iter()
                .map(|m| m.version)
                .filter(|v| *v <= current)
                .collect();
            return Err(MigrateError::MissingMigrations { current, missing });
        }
    }

    let upper = match limit {
        UpLimit::To(version) => version,
        UpLimit::All | UpLimit::One => MAX_VERSION,
    };
    let lower = if include_missing {
        match unapplied.iter().next() {
            Some(first) => first.version,
            None => return Ok(Plan::new(current)),
        }
    } else {
        above_current
    };

    let mut plan = Plan::new(current);
    for migration in &migrations.in_range(lower, upper) {
        if state.is_applied(migration.version) {
            plan.push(StepAction::Skip, migration);
            continue;
        }
        require(migration, Direction::Up)?;
        plan.push(StepAction::Apply, migration);
        if limit == UpLimit::One {
            break;
        }
    }
    Ok(plan)
}

/// Plan a down-series over the applied versions, highest first.
///
/// Every step is validated before the plan is returned, so a migration with
/// no down body (or no file on disk) fails the command before anything runs.
pub fn plan_down(
    migrations: &Migrations,
    state: &LedgerState,
    limit: DownLimit,
) -> MigrateResult<Plan> {
    let current = state.current_version();
    let mut plan = Plan::new(current);
    if current == SENTINEL_VERSION {
        return Ok(plan);
    }

    let versions = match limit {
        DownLimit::One => vec![current],
        DownLimit::To(target) => state
            .applied_versions_desc()
            .into_iter()
            .filter(|v| *v > target)
            .collect(),
    };

    for version in versions {
        let migration = applied_migration(migrations, version)?;
        require(migration, Direction::Down)?;
        plan.push(StepAction::Rollback, migration);
    }
    Ok(plan)
}

/// Plan a rollback and reapply of the current version.
pub fn plan_redo(migrations: &Migrations, state: &LedgerState) -> MigrateResult<Plan> {
    let current = state.current_version();
    let mut plan = Plan::new(current);
    if current == SENTINEL_VERSION {
        return Ok(plan);
    }

    let migration = applied_migration(migrations, current)?;
    require(migration, Direction::Down)?;
    require(migration, Direction::Up)?;
    plan.push(StepAction::Rollback, migration);
    plan.push(StepAction::Apply, migration);
    Ok(plan)
}

fn applied_migration(migrations: &Migrations, version: i64) -> MigrateResult<&Migration> {
    migrations.find(version).ok_or_else(|| MigrateError::NotFound {
        what: format!("version {version} is applied but has no migration file"),
    })
}

fn require(migration: &Migration, direction: Direction) -> MigrateResult<()> {
    if migration.has(direction) {
        Ok(())
    } else {
        Err(MigrateError::NoOp {
            version: migration.version,
            path: migration.source.display().to_string(),
            direction,
        })
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
