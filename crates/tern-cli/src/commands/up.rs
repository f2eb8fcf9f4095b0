//! Up, up-by-one and up-to command implementations

use anyhow::Result;
use tern_migrate::Command;

use crate::cli::{GlobalArgs, UpArgs, UpToArgs};
use crate::commands::common::run_series;

/// Execute the up command
pub(crate) fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    run_series(global, Command::Up, args.run.dry_run, args.include_missing)
}

/// Execute the up-by-one command
pub(crate) fn execute_by_one(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    run_series(
        global,
        Command::UpByOne,
        args.run.dry_run,
        args.include_missing,
    )
}

/// Execute the up-to command
pub(crate) fn execute_to(args: &UpToArgs, global: &GlobalArgs) -> Result<()> {
    run_series(
        global,
        Command::UpTo(args.version),
        args.up.run.dry_run,
        args.up.include_missing,
    )
}
