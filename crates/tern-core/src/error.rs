//! Error types for tern-core

use thiserror::Error;

/// Core error type for tern
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Migration script has no usable annotations
    #[error("[E003] Failed to parse migration script {path}: {message}")]
    ScriptParse { path: String, message: String },

    /// E004: Invalid migration name passed to `create`
    #[error("[E004] Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// E005: Unknown migration kind
    #[error("[E005] Unknown migration kind '{kind}': expected 'sql' or 'rs'")]
    UnknownKind { kind: String },

    /// E006: Refusing to overwrite an existing migration file
    #[error("[E006] Migration file already exists: {path}")]
    MigrationExists { path: String },

    /// E007: IO error with file path context
    #[error("[E007] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E008: YAML parse error
    #[error("[E008] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
