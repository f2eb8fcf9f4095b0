//! Database connection wrapper.
//!
//! [`MigrationDb`] owns a DuckDB [`Connection`] and provides helpers for
//! opening the target database and running work inside a transaction.

use crate::error::{DbError, DbResult};
use duckdb::Connection;
use std::path::Path;
use tern_core::{DatabaseConfig, Dialect};

/// Wrapper around the single connection a tern invocation uses.
///
/// Single-threaded: migrations run one at a time, so no `Mutex` is needed.
pub struct MigrationDb {
    conn: Connection,
    dialect: Dialect,
}

impl MigrationDb {
    /// Open (or create) a DuckDB database at `path`.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn,
            dialect: Dialect::DuckDb,
        })
    }

    /// Create an in-memory DuckDB database.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn open_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn,
            dialect: Dialect::DuckDb,
        })
    }

    /// Open the database described by a config section (handles `:memory:`).
    pub fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        match config.dialect {
            Dialect::DuckDb if config.path == ":memory:" => Self::open_memory(),
            Dialect::DuckDb => Self::open(Path::new(&config.path)),
            other => Err(DbError::NotImplemented {
                backend: other.to_string(),
                feature: "connections".to_string(),
            }),
        }
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Dialect used to generate ledger SQL for this connection.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    ///
    /// The error type is the caller's, so failures raised inside `body` come
    /// back unchanged; only BEGIN/COMMIT failures are converted from
    /// [`DbError`].
    pub fn transaction<F, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    ))
                    .into());
                }
            }
            Err(_) => {
                if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK") {
                    log::warn!("ROLLBACK failed: {rollback_err}");
                }
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
