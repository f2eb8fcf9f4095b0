//! tern CLI - versioned, reversible schema migrations

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{create, down, fix, status, up};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Up(args) => up::execute(args, &cli.global),
        cli::Commands::UpByOne(args) => up::execute_by_one(args, &cli.global),
        cli::Commands::UpTo(args) => up::execute_to(args, &cli.global),
        cli::Commands::Down(args) => down::execute(args, &cli.global),
        cli::Commands::DownTo(args) => down::execute_to(args, &cli.global),
        cli::Commands::Redo(args) => down::execute_redo(args, &cli.global),
        cli::Commands::Reset(args) => down::execute_reset(args, &cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::Version => status::execute_version(&cli.global),
        cli::Commands::Create(args) => create::execute(args, &cli.global),
        cli::Commands::Fix(args) => fix::execute(args, &cli.global),
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
