//! Ordered collection of discovered migrations.

use crate::error::{MigrateError, MigrateResult};
use crate::migration::Migration;
use tern_core::VersionScheme;
use tern_db::LedgerState;

/// Migrations sorted by ascending, unique version.
#[derive(Debug, Clone, Default)]
pub struct Migrations {
    items: Vec<Migration>,
}

impl Migrations {
    /// Sort `items` by version, failing on the first duplicate.
    pub fn new(mut items: Vec<Migration>) -> MigrateResult<Self> {
        items.sort_by_key(|m| m.version);
        if let Some(pair) = items.windows(2).find(|w| w[0].version == w[1].version) {
            return Err(MigrateError::Discovery {
                version: pair[0].version,
                first: pair[0].source.display().to_string(),
                second: pair[1].source.display().to_string(),
            });
        }
        Ok(Self { items })
    }

    fn filtered(&self, keep: impl Fn(&Migration) -> bool) -> Self {
        Self {
            items: self.items.iter().filter(|m| keep(m)).cloned().collect(),
        }
    }

    /// All migrations with `min <= version <= max`, ascending.
    pub fn in_range(&self, min: i64, max: i64) -> Self {
        self.filtered(|m| m.version >= min && m.version <= max)
    }

    /// Migrations whose version is a `YYYYMMDDHHMMSS` timestamp.
    pub fn timestamped(&self) -> Self {
        self.filtered(|m| m.scheme() == VersionScheme::Timestamped)
    }

    /// Migrations whose version is not a timestamp.
    pub fn sequential(&self) -> Self {
        self.filtered(|m| m.scheme() == VersionScheme::Sequential)
    }

    /// Highest-versioned migration.
    pub fn last(&self) -> MigrateResult<&Migration> {
        self.items.last().ok_or_else(|| MigrateError::NotFound {
            what: "no migrations in collection".to_string(),
        })
    }

    /// Highest sequential migration; `EmptyScheme` when there are none.
    pub fn last_sequential(&self) -> MigrateResult<&Migration> {
        self.items
            .iter()
            .rev()
            .find(|m| m.scheme() == VersionScheme::Sequential)
            .ok_or(MigrateError::EmptyScheme {
                scheme: VersionScheme::Sequential,
            })
    }

    /// Migrations whose latest ledger state is not applied, ascending.
    pub fn unapplied_against(&self, state: &LedgerState) -> Self {
        self.filtered(|m| !state.is_applied(m.version))
    }

    /// Look up a migration by version.
    pub fn find(&self, version: i64) -> Option<&Migration> {
        self.items
            .binary_search_by_key(&version, |m| m.version)
            .ok()
            .map(|idx| &self.items[idx])
    }

    pub fn versions(&self) -> Vec<i64> {
        self.items.iter().map(|m| m.version).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Migration> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Migrations {
    type Item = &'a Migration;
    type IntoIter = std::slice::Iter<'a, Migration>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[path = "collection_test.rs"]
mod tests;
