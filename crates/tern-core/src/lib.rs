//! tern-core - Core library for tern
//!
//! This crate provides configuration parsing, the version numbering schemes,
//! migration file naming, SQL script parsing, and templates for new
//! migrations. It has no database dependency.

pub mod config;
pub mod error;
pub mod naming;
pub mod script;
pub mod template;
pub mod version;

pub use config::{Config, DatabaseConfig, Dialect};
pub use error::{CoreError, CoreResult};
pub use naming::{parse_file_name, parse_path, MigrationFileName, MigrationKind};
pub use script::{parse_script, read_script, ScriptBody};
pub use version::{VersionScheme, MAX_VERSION, MIN_VERSION, SENTINEL_VERSION};
