//! Parsing of annotated SQL migration scripts.
//!
//! A script is split into sections by directive comments:
//!
//! ```sql
//! -- +tern Up
//! CREATE TABLE users (id INTEGER);
//!
//! -- +tern Down
//! DROP TABLE users;
//! ```
//!
//! `StatementBegin` / `StatementEnd` directives are accepted and dropped;
//! each section is executed as a single batch.

use crate::error::{CoreError, CoreResult};
use std::path::Path;

/// Comment prefix that introduces a directive.
pub const DIRECTIVE_PREFIX: &str = "-- +tern";

/// The two bodies of a script migration.
///
/// A body is `Some` when its directive is present in the file, even if the
/// section is empty; an empty body is a valid no-op transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptBody {
    pub up: Option<String>,
    pub down: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Up,
    Down,
}

/// Split `content` into up and down sections.
///
/// `origin` is only used in error messages.
pub fn parse_script(content: &str, origin: &str) -> CoreResult<ScriptBody> {
    let mut body = ScriptBody::default();
    let mut section = Section::Preamble;

    for (line_no, line) in content.lines().enumerate() {
        let Some(directive) = directive_of(line) else {
            let target = match section {
                Section::Preamble => None,
                Section::Up => body.up.as_mut(),
                Section::Down => body.down.as_mut(),
            };
            if let Some(buf) = target {
                buf.push_str(line);
                buf.push('\n');
            }
            continue;
        };

        match directive.to_ascii_lowercase().as_str() {
            "up" => {
                if body.up.is_some() {
                    return Err(parse_error(origin, line_no, "duplicate Up directive"));
                }
                body.up = Some(String::new());
                section = Section::Up;
            }
            "down" => {
                if body.down.is_some() {
                    return Err(parse_error(origin, line_no, "duplicate Down directive"));
                }
                body.down = Some(String::new());
                section = Section::Down;
            }
            "statementbegin" | "statementend" => {
                if section == Section::Preamble {
                    return Err(parse_error(
                        origin,
                        line_no,
                        "statement directive before any Up/Down section",
                    ));
                }
            }
            other => {
                return Err(parse_error(
                    origin,
                    line_no,
                    &format!("unknown directive '{other}'"),
                ))
            }
        }
    }

    if body.up.is_none() {
        return Err(CoreError::ScriptParse {
            path: origin.to_string(),
            message: format!("no '{DIRECTIVE_PREFIX} Up' directive found"),
        });
    }
    Ok(body)
}

/// Read and parse a script file from disk.
pub fn read_script(path: &Path) -> CoreResult<ScriptBody> {
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_script(&content, &path.display().to_string())
}

/// True if `sql` contains anything besides blank lines and `--` comments.
///
/// Sections left as template comments are skipped rather than sent to the
/// driver, which rejects batches without a statement.
pub fn has_statements(sql: &str) -> bool {
    sql.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with("--")
    })
}

/// Return the directive word if `line` is a directive comment.
fn directive_of(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix(DIRECTIVE_PREFIX)?;
    // `-- +ternary` is an ordinary comment, not a directive
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

fn parse_error(origin: &str, line_no: usize, message: &str) -> CoreError {
    CoreError::ScriptParse {
        path: origin.to_string(),
        message: format!("line {}: {message}", line_no + 1),
    }
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
