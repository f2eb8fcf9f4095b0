//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// tern - versioned, reversible schema migrations
#[derive(Parser, Debug)]
#[command(name = "tern")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the migrations directory
    #[arg(short, long, global = true, env = "TERN_DIR")]
    pub dir: Option<String>,

    /// Override the database path
    #[arg(long, global = true, env = "TERN_DATABASE")]
    pub database: Option<String>,

    /// Override the ledger table name
    #[arg(long, global = true)]
    pub table: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply every pending migration
    Up(UpArgs),

    /// Apply the next pending migration
    UpByOne(UpArgs),

    /// Apply pending migrations up to and including VERSION
    UpTo(UpToArgs),

    /// Roll back the current version
    Down(RunArgs),

    /// Roll back every applied version above VERSION
    DownTo(DownToArgs),

    /// Roll back and reapply the current version
    Redo(RunArgs),

    /// Roll back every applied version
    Reset(RunArgs),

    /// Show the state of every migration
    Status(StatusArgs),

    /// Print the current version
    Version,

    /// Create a new migration file
    Create(CreateArgs),

    /// Renumber timestamped migrations into sequential versions
    Fix(RunArgs),
}

/// Flags shared by commands that change the database
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct RunArgs {
    /// Show what would run without touching the database
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the up and up-by-one commands
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct UpArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Apply unapplied migrations below the current version instead of failing
    #[arg(long)]
    pub include_missing: bool,
}

/// Arguments for the up-to command
#[derive(Args, Debug)]
pub struct UpToArgs {
    /// Highest version to apply
    pub version: i64,

    #[command(flatten)]
    pub up: UpArgs,
}

/// Arguments for the down-to command
#[derive(Args, Debug)]
pub struct DownToArgs {
    /// Version to stop at; it stays applied
    pub version: i64,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only list migrations that are not applied
    #[arg(long)]
    pub unapplied_only: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Description of the migration, used in the file name
    pub name: String,

    /// Migration kind; defaults to `default_kind` from tern.yml
    #[arg(value_enum)]
    pub kind: Option<KindArg>,

    /// Use the next sequential version instead of a timestamp
    #[arg(long)]
    pub sequential: bool,
}

/// Migration kinds accepted by create
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    /// SQL script with up/down sections
    Sql,
    /// Rust functions registered by version
    Rs,
}

impl From<KindArg> for tern_core::MigrationKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Sql => tern_core::MigrationKind::Script,
            KindArg::Rs => tern_core::MigrationKind::Programmatic,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
