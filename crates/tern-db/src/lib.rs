//! tern-db - Database layer for tern
//!
//! Provides the DuckDB connection wrapper with its transaction helper, ledger
//! SQL rendering per dialect, and the append-only version ledger.

pub mod connection;
pub mod dialect;
pub mod error;
pub mod ledger;

pub use connection::MigrationDb;
pub use dialect::LedgerSql;
pub use duckdb::Connection;
pub use error::{DbError, DbResult};
pub use ledger::{LedgerEntry, LedgerRecord, LedgerState, LedgerStore};
