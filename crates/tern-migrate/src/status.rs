//! Status reports joining discovered migrations with the ledger.

use crate::collection::Migrations;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tern_core::{MigrationKind, VersionScheme};
use tern_db::LedgerState;

/// Ledger-derived state of one migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MigrationState {
    Applied { at: DateTime<Utc> },
    Pending,
    /// Pending, with a higher version already applied
    Missed,
}

impl MigrationState {
    pub fn is_applied(&self) -> bool {
        matches!(self, MigrationState::Applied { .. })
    }
}

impl std::fmt::Display for MigrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationState::Applied { at } => write!(f, "{}", at.format("%a %b %e %H:%M:%S %Y")),
            MigrationState::Pending => write!(f, "Pending"),
            MigrationState::Missed => write!(f, "Pending (MISSED)"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusEntry {
    pub version: i64,
    pub source: String,
    pub kind: MigrationKind,
    pub scheme: VersionScheme,
    #[serde(flatten)]
    pub state: MigrationState,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub current_version: i64,
    pub entries: Vec<StatusEntry>,
}

impl StatusReport {
    /// Build a report for every migration, or only the unapplied ones.
    pub fn build(migrations: &Migrations, state: &LedgerState, unapplied_only: bool) -> Self {
        let current_version = state.current_version();
        let entries = migrations
            .iter()
            .map(|m| {
                let state = match state.get(m.version) {
                    Some(entry) if entry.is_applied => MigrationState::Applied {
                        at: entry.applied_at,
                    },
                    _ if m.version < current_version => MigrationState::Missed,
                    _ => MigrationState::Pending,
                };
                StatusEntry {
                    version: m.version,
                    source: m.name(),
                    kind: m.kind(),
                    scheme: m.scheme(),
                    state,
                }
            })
            .filter(|e| !unapplied_only || !e.state.is_applied())
            .collect();

        Self {
            current_version,
            entries,
        }
    }

    pub fn missed(&self) -> Vec<i64> {
        self.entries
            .iter()
            .filter(|e| e.state == MigrationState::Missed)
            .map(|e| e.version)
            .collect()
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
