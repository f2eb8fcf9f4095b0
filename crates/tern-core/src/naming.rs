//! Migration file naming: `<version>_<description>.<ext>`.
//!
//! The version is the run of digits before the first `_`. Files whose names
//! do not follow the pattern are not migrations and are ignored by discovery.

use crate::error::CoreError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Extension of script (SQL) migrations.
pub const SCRIPT_EXTENSION: &str = "sql";

/// Extension of programmatic (registered function) migrations.
pub const PROGRAMMATIC_EXTENSION: &str = "rs";

/// How a migration's transition bodies are provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MigrationKind {
    /// SQL file with annotated up/down sections
    #[default]
    #[serde(rename = "sql")]
    Script,
    /// Rust functions looked up in a registry by version
    #[serde(rename = "rs")]
    Programmatic,
}

impl MigrationKind {
    /// File extension for this kind (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            MigrationKind::Script => SCRIPT_EXTENSION,
            MigrationKind::Programmatic => PROGRAMMATIC_EXTENSION,
        }
    }

    /// Map a file extension back to its kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            SCRIPT_EXTENSION => Some(MigrationKind::Script),
            PROGRAMMATIC_EXTENSION => Some(MigrationKind::Programmatic),
            _ => None,
        }
    }
}

impl std::fmt::Display for MigrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for MigrationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sql" => Ok(MigrationKind::Script),
            "rs" | "rust" => Ok(MigrationKind::Programmatic),
            _ => Err(CoreError::UnknownKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// A file name recognised as a migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFileName {
    /// Version parsed from the numeric prefix
    pub version: i64,
    /// Text between the separator and the extension
    pub description: String,
    /// Kind derived from the extension
    pub kind: MigrationKind,
}

fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)_([^/\\]+)\.([A-Za-z]+)$").expect("valid regex literal")
    })
}

/// Parse a bare file name such as `00002_add_users.sql`.
///
/// Returns `None` for anything that is not a migration: wrong extension,
/// missing separator, version of zero, or a version that overflows `i64`.
pub fn parse_file_name(name: &str) -> Option<MigrationFileName> {
    let caps = file_name_pattern().captures(name)?;
    let kind = MigrationKind::from_extension(&caps[3])?;
    let version: i64 = caps[1].parse().ok()?;
    if version < 1 {
        return None;
    }
    Some(MigrationFileName {
        version,
        description: caps[2].to_string(),
        kind,
    })
}

/// Parse the file-name component of `path`.
pub fn parse_path(path: &Path) -> Option<MigrationFileName> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(parse_file_name)
}

/// Build the file name for a new migration.
pub fn format_file_name(version_token: &str, description: &str, kind: MigrationKind) -> String {
    format!("{version_token}_{description}.{}", kind.extension())
}

/// Replace the leading version token of `path`'s file name with `new_token`.
///
/// Only the file name is touched; parent directories that happen to contain
/// the same digits are left alone. Returns `None` if the file name does not
/// start with `old_version`.
pub fn replace_version_token(path: &Path, old_version: i64, new_token: &str) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let rest = name.strip_prefix(&old_version.to_string())?;
    let new_name = format!("{new_token}{rest}");
    Some(match path.parent() {
        Some(parent) => parent.join(new_name),
        None => PathBuf::from(new_name),
    })
}

/// Turn a free-form name into a snake_case description.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = true;
    let mut prev_lower = false;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower && !prev_underscore {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
            prev_lower = false;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

#[cfg(test)]
#[path = "naming_test.rs"]
mod tests;
