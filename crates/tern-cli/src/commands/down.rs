//! Down, down-to, redo and reset command implementations

use anyhow::Result;
use tern_migrate::Command;

use crate::cli::{DownToArgs, GlobalArgs, RunArgs};
use crate::commands::common::run_series;

/// Execute the down command
pub(crate) fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    run_series(global, Command::Down, args.dry_run, false)
}

/// Execute the down-to command
pub(crate) fn execute_to(args: &DownToArgs, global: &GlobalArgs) -> Result<()> {
    run_series(global, Command::DownTo(args.version), args.run.dry_run, false)
}

/// Execute the redo command
pub(crate) fn execute_redo(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    run_series(global, Command::Redo, args.dry_run, false)
}

/// Execute the reset command
pub(crate) fn execute_reset(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    run_series(global, Command::Reset, args.dry_run, false)
}
