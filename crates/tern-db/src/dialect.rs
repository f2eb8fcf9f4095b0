//! Ledger SQL generation per dialect.
//!
//! The ledger table name is configuration, so every statement is rendered
//! once from a `(Dialect, table)` pair and carried by value.

use tern_core::Dialect;

/// Rendered SQL for one ledger table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSql {
    dialect: Dialect,
    table: String,
}

impl LedgerSql {
    /// `table` may be schema-qualified (`schema.name`). It must already be a
    /// validated identifier; see `tern_core::Config::validate`.
    pub fn new(dialect: Dialect, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Split the table name into `(schema, name)`, defaulting the schema.
    pub fn schema_and_name(&self) -> (&str, &str) {
        match self.table.rsplit_once('.') {
            Some((schema, name)) => (schema, name),
            None => (self.default_schema(), &self.table),
        }
    }

    fn default_schema(&self) -> &'static str {
        match self.dialect {
            Dialect::DuckDb => "main",
            Dialect::Postgres => "public",
        }
    }

    fn sequence(&self) -> String {
        format!("{}_id_seq", self.table)
    }

    fn placeholder(&self, n: usize) -> String {
        match self.dialect {
            Dialect::DuckDb => "?".to_string(),
            Dialect::Postgres => format!("${n}"),
        }
    }

    /// Statements creating the ledger (schema, sequence, table) if absent.
    pub fn create_table(&self) -> String {
        let mut sql = String::new();
        if let Some((schema, _)) = self.table.rsplit_once('.') {
            sql.push_str(&format!("CREATE SCHEMA IF NOT EXISTS {schema};\n"));
        }
        match self.dialect {
            Dialect::DuckDb => {
                sql.push_str(&format!(
                    "CREATE SEQUENCE IF NOT EXISTS {seq};
CREATE TABLE IF NOT EXISTS {table} (
    id         BIGINT NOT NULL DEFAULT nextval('{seq}'),
    version_id BIGINT NOT NULL,
    is_applied BOOLEAN NOT NULL,
    tstamp     TIMESTAMP NOT NULL DEFAULT current_timestamp
);",
                    seq = self.sequence(),
                    table = self.table,
                ));
            }
            Dialect::Postgres => {
                sql.push_str(&format!(
                    "CREATE TABLE IF NOT EXISTS {table} (
    id         BIGSERIAL PRIMARY KEY,
    version_id BIGINT NOT NULL,
    is_applied BOOLEAN NOT NULL,
    tstamp     TIMESTAMP NOT NULL DEFAULT now()
);",
                    table = self.table,
                ));
            }
        }
        sql
    }

    /// Count tables matching `(schema, name)`; bind both as parameters.
    pub fn table_exists(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = {} AND table_name = {}",
            self.placeholder(1),
            self.placeholder(2)
        )
    }

    /// Count rows for one version; bind the version.
    pub fn count_version(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE version_id = {}",
            self.table,
            self.placeholder(1)
        )
    }

    /// Append one application event; bind `(version_id, is_applied)`.
    pub fn insert_version(&self) -> String {
        format!(
            "INSERT INTO {} (version_id, is_applied) VALUES ({}, {})",
            self.table,
            self.placeholder(1),
            self.placeholder(2)
        )
    }

    /// Move every row of a version to a new version; bind `(new, old)`.
    pub fn update_version(&self) -> String {
        format!(
            "UPDATE {} SET version_id = {} WHERE version_id = {}",
            self.table,
            self.placeholder(1),
            self.placeholder(2)
        )
    }

    /// The most recent row of every version, with the timestamp as epoch
    /// microseconds. Ties on `tstamp` are broken by insertion order.
    pub fn latest_rows(&self) -> String {
        format!(
            "SELECT version_id, is_applied, {micros} FROM (
    SELECT version_id, is_applied, tstamp,
           row_number() OVER (PARTITION BY version_id ORDER BY tstamp DESC, id DESC) AS rn
    FROM {table}
) AS latest
WHERE rn = 1
ORDER BY version_id",
            micros = self.epoch_micros("tstamp"),
            table = self.table,
        )
    }

    /// Every row in insertion order.
    pub fn all_rows(&self) -> String {
        format!(
            "SELECT id, version_id, is_applied, {} FROM {} ORDER BY id",
            self.epoch_micros("tstamp"),
            self.table
        )
    }

    fn epoch_micros(&self, column: &str) -> String {
        match self.dialect {
            Dialect::DuckDb => format!("epoch_us({column})"),
            Dialect::Postgres => format!("CAST(EXTRACT(EPOCH FROM {column}) * 1000000 AS BIGINT)"),
        }
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
