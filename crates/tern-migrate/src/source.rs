//! Migration discovery.
//!
//! Scans one flat directory for `<version>_<description>.sql` and
//! `<version>_<description>.rs` files. Scripts are parsed here so a malformed
//! file fails the command before anything runs; programmatic files are
//! resolved against the registry.

use crate::collection::Migrations;
use crate::error::{MigrateError, MigrateResult};
use crate::migration::{Migration, MigrationBody};
use crate::registry::MigrationRegistry;
use std::path::{Path, PathBuf};
use tern_core::{parse_path, read_script, MigrationKind};

/// Collect every migration in `dir` with `min <= version <= max`.
///
/// Files whose names do not parse as migrations are skipped. Two files with
/// the same version fail with [`MigrateError::Discovery`].
pub fn collect_migrations(
    dir: &Path,
    min: i64,
    max: i64,
    registry: &MigrationRegistry,
) -> MigrateResult<Migrations> {
    let entries = std::fs::read_dir(dir).map_err(|e| MigrateError::ReadDir {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MigrateError::ReadDir {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    // read_dir order is platform-dependent
    paths.sort();

    let mut found = Vec::new();
    for path in paths {
        let Some(parsed) = parse_path(&path) else {
            log::debug!("Skipping non-migration file {}", path.display());
            continue;
        };
        if parsed.version < min || parsed.version > max {
            continue;
        }

        let body = match parsed.kind {
            MigrationKind::Script => MigrationBody::Script(read_script(&path)?),
            MigrationKind::Programmatic => match registry.get(parsed.version) {
                Some(registered) => MigrationBody::Programmatic(registered),
                None => {
                    return Err(MigrateError::Registration {
                        version: parsed.version,
                        path: path.display().to_string(),
                    })
                }
            },
        };
        found.push(Migration::new(parsed.version, path, body));
    }

    log::debug!("Discovered {} migrations in {}", found.len(), dir.display());
    Migrations::new(found)
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
