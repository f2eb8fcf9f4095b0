//! Templates for `tern create`.

use crate::error::{CoreError, CoreResult};
use crate::naming::{format_file_name, snake_case, MigrationKind};
use std::path::{Path, PathBuf};

const SCRIPT_TEMPLATE: &str = "-- +tern Up
-- SQL in this section is executed when the migration is applied.

-- +tern Down
-- SQL in this section is executed when the migration is rolled back.
";

const PROGRAMMATIC_TEMPLATE: &str = "//! Migration {version}: {description}
//!
//! Register both functions under version {version}:
//!
//!     registry.register({version}, Some(up), Some(down))?;

use tern_db::{DbResult, Connection};

pub fn up(conn: &Connection) -> DbResult<()> {
    let _ = conn;
    Ok(())
}

pub fn down(conn: &Connection) -> DbResult<()> {
    let _ = conn;
    Ok(())
}
";

/// Render the initial contents of a new migration file.
pub fn render(kind: MigrationKind, version: i64, description: &str) -> String {
    match kind {
        MigrationKind::Script => SCRIPT_TEMPLATE.to_string(),
        MigrationKind::Programmatic => PROGRAMMATIC_TEMPLATE
            .replace("{version}", &version.to_string())
            .replace("{description}", description),
    }
}

/// Write a new migration file into `dir`, creating the directory if needed.
///
/// `version_token` is used verbatim as the file-name prefix so sequential
/// versions keep their zero padding. Returns the path of the new file.
pub fn create_migration_file(
    dir: &Path,
    version_token: &str,
    name: &str,
    kind: MigrationKind,
) -> CoreResult<PathBuf> {
    let description = snake_case(name);
    if description.is_empty() {
        return Err(CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: "must contain at least one letter or digit".to_string(),
        });
    }
    let version: i64 = version_token
        .parse()
        .map_err(|_| CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: format!("version token '{version_token}' is not a number"),
        })?;

    std::fs::create_dir_all(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let path = dir.join(format_file_name(version_token, &description, kind));
    if path.exists() {
        return Err(CoreError::MigrationExists {
            path: path.display().to_string(),
        });
    }

    std::fs::write(&path, render(kind, version, &description)).map_err(|e| {
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        }
    })?;
    log::debug!("Created migration file {}", path.display());
    Ok(path)
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
