//! Error types for the migration engine.

use crate::migration::Direction;
use tern_core::{CoreError, VersionScheme};
use tern_db::DbError;
use thiserror::Error;

/// Migration engine errors.
///
/// Every variant aborts the command that raised it.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Two files on disk resolve to the same version (M001).
    #[error("[M001] Duplicate migration version {version}: {first} and {second}")]
    Discovery {
        version: i64,
        first: String,
        second: String,
    },

    /// A programmatic migration file has no registry entry (M002).
    #[error("[M002] Programmatic migration {version} ({path}) is not registered")]
    Registration { version: i64, path: String },

    /// The same version was registered twice (M003).
    #[error("[M003] Programmatic migration {version} is registered more than once")]
    DuplicateRegistration { version: i64 },

    /// A definite migration was required but none exists (M004).
    #[error("[M004] No migration found: {what}")]
    NotFound { what: String },

    /// No migration of the requested numbering scheme exists (M005).
    #[error("[M005] No {scheme} migrations found")]
    EmptyScheme { scheme: VersionScheme },

    /// Unapplied migrations exist below the current version (M006).
    #[error(
        "[M006] Missing migrations found below current version {current}: {}. \
         Run `tern status --unapplied-only` to list them, or re-run with \
         --include-missing to apply them as well",
        format_versions(.missing)
    )]
    MissingMigrations { current: i64, missing: Vec<i64> },

    /// The requested direction has no body (M007).
    #[error("[M007] Migration {version} ({path}) has no {direction} body")]
    NoOp {
        version: i64,
        path: String,
        direction: Direction,
    },

    /// The migration body failed; its transaction was rolled back (M008).
    #[error("[M008] Migration {version} ({path}) failed while migrating {direction}")]
    Execution {
        version: i64,
        path: String,
        direction: Direction,
        #[source]
        source: DbError,
    },

    /// The ledger could not be updated to match the data change (M009).
    #[error("[M009] Failed to persist ledger state for migration {version}")]
    Persistence {
        version: i64,
        #[source]
        source: DbError,
    },

    /// The migrations directory could not be read (M010).
    #[error("[M010] Failed to read migrations directory {path}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A renumbering file rename failed (M011).
    #[error("[M011] Failed to rename {from} to {to}")]
    Rename {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    /// The highest sequential version leaves no slot to number into (M012).
    #[error("[M012] No sequential version left after {after}")]
    NoSequentialSlot { after: i64 },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

fn format_versions(versions: &[i64]) -> String {
    versions
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
