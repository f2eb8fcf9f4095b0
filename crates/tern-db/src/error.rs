//! Error types for tern-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table, view or its schema not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Transaction management error (D004)
    #[error("[D004] Transaction failed: {0}")]
    TransactionError(String),

    /// Ledger table read or write failed (D005)
    #[error("[D005] Version ledger operation failed: {0}")]
    LedgerError(String),

    /// Not implemented (D006)
    #[error("[D006] Feature not implemented for {backend}: {feature}")]
    NotImplemented { backend: String, feature: String },
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        let msg = err.to_string();
        if is_missing_relation(&msg) {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}

/// DuckDB reports catalog misses only through the message text. A table in
/// a schema that does not exist is just as missing as the table itself.
fn is_missing_relation(msg: &str) -> bool {
    msg.contains("does not exist")
        && ["Table with name", "View with name", "Table or view with name", "Schema with name"]
            .iter()
            .any(|prefix| msg.contains(prefix))
}
