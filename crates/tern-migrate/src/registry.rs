//! Registry of programmatic migrations.
//!
//! Programmatic migrations are Rust functions compiled into the binary. A
//! `<version>_<name>.rs` file on disk marks the version; the functions are
//! looked up here by that version during discovery.

use crate::error::{MigrateError, MigrateResult};
use std::collections::BTreeMap;
use tern_db::{Connection, DbResult};

/// Signature of one programmatic transition.
///
/// Runs inside the executor's transaction; it must not commit or roll back.
pub type MigrationFn = fn(&Connection) -> DbResult<()>;

/// The up/down functions registered for one version.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisteredMigration {
    pub up: Option<MigrationFn>,
    pub down: Option<MigrationFn>,
}

/// Version-keyed lookup of programmatic migrations.
#[derive(Debug, Clone, Default)]
pub struct MigrationRegistry {
    entries: BTreeMap<i64, RegisteredMigration>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the functions for `version`. Either direction may be absent.
    pub fn register(
        &mut self,
        version: i64,
        up: Option<MigrationFn>,
        down: Option<MigrationFn>,
    ) -> MigrateResult<()> {
        if self.entries.contains_key(&version) {
            return Err(MigrateError::DuplicateRegistration { version });
        }
        self.entries.insert(version, RegisteredMigration { up, down });
        Ok(())
    }

    pub fn get(&self, version: i64) -> Option<RegisteredMigration> {
        self.entries.get(&version).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
