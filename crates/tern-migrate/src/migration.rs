//! The migration model.

use crate::registry::{MigrationFn, RegisteredMigration};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tern_core::script::has_statements;
use tern_core::{MigrationKind, ScriptBody, VersionScheme};
use tern_db::{Connection, DbResult};

/// Direction of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Transition bodies, tagged by how they are provided.
#[derive(Debug, Clone)]
pub enum MigrationBody {
    /// Parsed sections of a SQL file
    Script(ScriptBody),
    /// Functions resolved from the registry
    Programmatic(RegisteredMigration),
}

/// One runnable transition borrowed from a [`Migration`].
#[derive(Debug, Clone, Copy)]
pub enum Transition<'a> {
    Sql(&'a str),
    Function(MigrationFn),
}

impl Transition<'_> {
    /// Execute on `conn`. The caller owns the surrounding transaction.
    pub fn run(&self, conn: &Connection) -> DbResult<()> {
        match self {
            Transition::Sql(sql) => {
                if has_statements(sql) {
                    conn.execute_batch(sql)?;
                } else {
                    log::debug!("Section has no statements, nothing to execute");
                }
                Ok(())
            }
            Transition::Function(f) => f(conn),
        }
    }
}

/// A discovered migration.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub source: PathBuf,
    pub body: MigrationBody,
}

impl Migration {
    pub fn new(version: i64, source: impl Into<PathBuf>, body: MigrationBody) -> Self {
        Self {
            version,
            source: source.into(),
            body,
        }
    }

    pub fn kind(&self) -> MigrationKind {
        match self.body {
            MigrationBody::Script(_) => MigrationKind::Script,
            MigrationBody::Programmatic(_) => MigrationKind::Programmatic,
        }
    }

    pub fn scheme(&self) -> VersionScheme {
        VersionScheme::of(self.version)
    }

    /// The body for `direction`, if present.
    pub fn transition(&self, direction: Direction) -> Option<Transition<'_>> {
        match (&self.body, direction) {
            (MigrationBody::Script(s), Direction::Up) => s.up.as_deref().map(Transition::Sql),
            (MigrationBody::Script(s), Direction::Down) => {
                s.down.as_deref().map(Transition::Sql)
            }
            (MigrationBody::Programmatic(r), Direction::Up) => r.up.map(Transition::Function),
            (MigrationBody::Programmatic(r), Direction::Down) => r.down.map(Transition::Function),
        }
    }

    pub fn has(&self, direction: Direction) -> bool {
        self.transition(direction).is_some()
    }

    /// File name of the source, for log lines and status output.
    pub fn name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
