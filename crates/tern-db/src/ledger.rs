//! The version ledger.
//!
//! An append-only table with one row per application event:
//! `(id, version_id, is_applied, tstamp)`. The state of a version is its most
//! recent row; the current version is the highest version whose most recent
//! row is applied. Version 0 is written once when the table is created so an
//! initialised ledger always reports at least version 0.

use crate::connection::MigrationDb;
use crate::dialect::LedgerSql;
use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use duckdb::Connection;
use serde::Serialize;
use std::collections::BTreeMap;
use tern_core::{Dialect, SENTINEL_VERSION};

/// Latest known state of one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub is_applied: bool,
    pub applied_at: DateTime<Utc>,
}

/// One raw ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRecord {
    pub id: i64,
    pub version: i64,
    pub is_applied: bool,
    pub applied_at: DateTime<Utc>,
}

/// Snapshot of the latest state of every version in the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    latest: BTreeMap<i64, LedgerEntry>,
}

impl LedgerState {
    /// A ledger with no rows, as seen before the table exists.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a state from `(version, entry)` pairs.
    pub fn from_entries(entries: impl IntoIterator<Item = (i64, LedgerEntry)>) -> Self {
        Self {
            latest: entries.into_iter().collect(),
        }
    }

    /// Latest entry for `version`, if the ledger has ever seen it.
    pub fn get(&self, version: i64) -> Option<&LedgerEntry> {
        self.latest.get(&version)
    }

    /// True if the most recent row for `version` marks it applied.
    pub fn is_applied(&self, version: i64) -> bool {
        self.latest.get(&version).is_some_and(|e| e.is_applied)
    }

    /// Highest applied version, or the sentinel when nothing is applied.
    pub fn current_version(&self) -> i64 {
        self.latest
            .iter()
            .rev()
            .find(|(_, e)| e.is_applied)
            .map_or(SENTINEL_VERSION, |(v, _)| *v)
    }

    /// Applied versions above the sentinel, highest first.
    pub fn applied_versions_desc(&self) -> Vec<i64> {
        self.latest
            .iter()
            .rev()
            .filter(|(v, e)| e.is_applied && **v != SENTINEL_VERSION)
            .map(|(v, _)| *v)
            .collect()
    }

    /// Iterate `(version, entry)` pairs in ascending version order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &LedgerEntry)> {
        self.latest.iter().map(|(v, e)| (*v, e))
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

/// Reads and appends ledger rows for one configured table.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    sql: LedgerSql,
}

impl LedgerStore {
    pub fn new(dialect: Dialect, table: impl Into<String>) -> Self {
        Self {
            sql: LedgerSql::new(dialect, table),
        }
    }

    /// Store for `table` using the dialect of `db`.
    pub fn for_db(db: &MigrationDb, table: impl Into<String>) -> Self {
        Self::new(db.dialect(), table)
    }

    pub fn table(&self) -> &str {
        self.sql.table()
    }

    /// Whether the ledger table exists yet.
    pub fn exists(&self, conn: &Connection) -> DbResult<bool> {
        let (schema, name) = self.sql.schema_and_name();
        let count: i64 = conn
            .query_row(&self.sql.table_exists(), duckdb::params![schema, name], |row| {
                row.get(0)
            })
            .map_err(|e| DbError::LedgerError(format!("failed to look up ledger table: {e}")))?;
        Ok(count > 0)
    }

    /// Create the ledger table and its sentinel row if either is missing.
    ///
    /// Safe to call repeatedly; creation uses `IF NOT EXISTS` so a racing
    /// creator does not make this fail.
    pub fn ensure_initialized(&self, db: &MigrationDb) -> DbResult<()> {
        if self.exists(db.conn())? && self.has_sentinel(db.conn())? {
            return Ok(());
        }

        db.transaction(|conn| {
            conn.execute_batch(&self.sql.create_table()).map_err(|e| {
                DbError::LedgerError(format!(
                    "failed to create ledger table {}: {e}",
                    self.table()
                ))
            })?;
            if !self.has_sentinel(conn)? {
                log::info!("Initialised version ledger {}", self.table());
                self.record_transition(conn, SENTINEL_VERSION, true)?;
            }
            Ok(())
        })
    }

    fn has_sentinel(&self, conn: &Connection) -> DbResult<bool> {
        let count: i64 = conn
            .query_row(
                &self.sql.count_version(),
                duckdb::params![SENTINEL_VERSION],
                |row| row.get(0),
            )
            .map_err(|e| DbError::LedgerError(format!("failed to read sentinel row: {e}")))?;
        Ok(count > 0)
    }

    /// Current version, initialising the ledger first.
    pub fn current_version(&self, db: &MigrationDb) -> DbResult<i64> {
        Ok(self.applied_set(db)?.current_version())
    }

    /// Latest state of every version, initialising the ledger first.
    pub fn applied_set(&self, db: &MigrationDb) -> DbResult<LedgerState> {
        self.ensure_initialized(db)?;
        self.read_state(db.conn())
    }

    /// Latest state of every version without creating anything.
    ///
    /// A missing table reads as an empty ledger; used by dry runs.
    pub fn peek_state(&self, conn: &Connection) -> DbResult<LedgerState> {
        match self.read_state(conn) {
            Err(DbError::TableNotFound(_)) => Ok(LedgerState::empty()),
            other => other,
        }
    }

    /// Latest state of every version.
    ///
    /// A missing table is [`DbError::TableNotFound`].
    pub fn read_state(&self, conn: &Connection) -> DbResult<LedgerState> {
        let mut stmt = conn
            .prepare(&self.sql.latest_rows())
            .map_err(|e| self.failure("failed to read ledger", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .map_err(|e| DbError::LedgerError(format!("failed to read ledger: {e}")))?;

        let mut latest = BTreeMap::new();
        for row in rows {
            let (version, is_applied, micros) =
                row.map_err(|e| DbError::LedgerError(format!("ledger row error: {e}")))?;
            latest.insert(
                version,
                LedgerEntry {
                    is_applied,
                    applied_at: micros_to_datetime(micros)?,
                },
            );
        }
        Ok(LedgerState { latest })
    }

    /// Every ledger row in insertion order.
    pub fn records(&self, conn: &Connection) -> DbResult<Vec<LedgerRecord>> {
        let mut stmt = conn
            .prepare(&self.sql.all_rows())
            .map_err(|e| self.failure("failed to read ledger", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, bool>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })
            .map_err(|e| DbError::LedgerError(format!("failed to read ledger: {e}")))?;

        let mut records = Vec::new();
        for row in rows {
            let (id, version, is_applied, micros) =
                row.map_err(|e| DbError::LedgerError(format!("ledger row error: {e}")))?;
            records.push(LedgerRecord {
                id,
                version,
                is_applied,
                applied_at: micros_to_datetime(micros)?,
            });
        }
        Ok(records)
    }

    /// Append one row inside the caller's transaction.
    ///
    /// Never commits or rolls back; the caller owns the transaction.
    pub fn record_transition(&self, conn: &Connection, version: i64, applied: bool) -> DbResult<()> {
        conn.execute(&self.sql.insert_version(), duckdb::params![version, applied])
            .map_err(|e| {
                let state = if applied { "applied" } else { "rolled back" };
                self.failure(&format!("failed to record version {version} as {state}"), e)
            })?;
        Ok(())
    }

    /// Move every row of `old_version` to `new_version` in place.
    ///
    /// Returns the number of rows rewritten, which is zero for versions that
    /// were never applied.
    pub fn rewrite(&self, conn: &Connection, old_version: i64, new_version: i64) -> DbResult<usize> {
        conn.execute(
            &self.sql.update_version(),
            duckdb::params![new_version, old_version],
        )
        .map_err(|e| {
            self.failure(
                &format!("failed to rewrite version {old_version} to {new_version}"),
                e,
            )
        })
    }

    /// Wrap a ledger SQL failure. A missing ledger table stays
    /// distinguishable so callers can treat it as "not initialised".
    fn failure(&self, action: &str, err: duckdb::Error) -> DbError {
        let msg = err.to_string();
        match DbError::from(err) {
            DbError::TableNotFound(_) => {
                DbError::TableNotFound(format!("version ledger {}: {msg}", self.table()))
            }
            _ => DbError::LedgerError(format!("{action}: {msg}")),
        }
    }
}

fn micros_to_datetime(micros: i64) -> DbResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| DbError::LedgerError(format!("timestamp out of range: {micros}")))
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
