//! Version numbering schemes.
//!
//! Versions are positive `i64`s. A version whose decimal form is a valid
//! `YYYYMMDDHHMMSS` wall-clock value is *timestamped*; every other version is
//! *sequential*. Version 0 is reserved for the ledger's bootstrap row.

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

/// The bootstrap version recorded when the ledger is first created.
pub const SENTINEL_VERSION: i64 = 0;

/// Lowest version a discovered migration may have.
pub const MIN_VERSION: i64 = 1;

/// Highest representable version.
pub const MAX_VERSION: i64 = i64::MAX;

/// `chrono` format of a timestamped version.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Width that sequential versions are zero-padded to in file names.
pub const SEQUENTIAL_WIDTH: usize = 5;

/// Which numbering scheme a version belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionScheme {
    Sequential,
    Timestamped,
}

impl VersionScheme {
    /// Classify a version.
    pub fn of(version: i64) -> Self {
        if is_timestamp(version) {
            VersionScheme::Timestamped
        } else {
            VersionScheme::Sequential
        }
    }
}

impl std::fmt::Display for VersionScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionScheme::Sequential => write!(f, "sequential"),
            VersionScheme::Timestamped => write!(f, "timestamped"),
        }
    }
}

/// True when `version` is exactly 14 digits and parses as a calendar
/// date-time (`20230230000000` is rejected: there is no February 30th).
pub fn is_timestamp(version: i64) -> bool {
    let digits = version.to_string();
    digits.len() == 14 && NaiveDateTime::parse_from_str(&digits, TIMESTAMP_FORMAT).is_ok()
}

/// Timestamped version for the current UTC time.
pub fn timestamp_version_now() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Zero-padded file-name token for a sequential version.
pub fn sequential_token(version: i64) -> String {
    format!("{:0width$}", version, width = SEQUENTIAL_WIDTH)
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
