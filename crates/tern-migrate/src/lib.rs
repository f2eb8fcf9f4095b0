//! tern-migrate - Migration engine for tern
//!
//! Discovers migrations on disk, reconciles them against the version ledger,
//! and applies or rolls them back one transaction at a time. Also renumbers
//! timestamped migrations into sequential versions.

pub mod collection;
pub mod error;
pub mod executor;
pub mod fix;
pub mod migration;
pub mod migrator;
pub mod plan;
pub mod registry;
pub mod source;
pub mod status;

pub use collection::Migrations;
pub use error::{MigrateError, MigrateResult};
pub use executor::Executor;
pub use fix::{next_sequential_version, FixReport, Renumbering};
pub use migration::{Direction, Migration, MigrationBody};
pub use migrator::{Command, CommandOutcome, Migrator, MigratorOptions, RunEntry, RunReport};
pub use plan::{DownLimit, Plan, PlanStep, StepAction, UpLimit};
pub use registry::{MigrationFn, MigrationRegistry, RegisteredMigration};
pub use source::collect_migrations;
pub use status::{MigrationState, StatusEntry, StatusReport};
