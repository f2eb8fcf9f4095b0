//! Create command implementation

use anyhow::{Context, Result};
use tern_migrate::{Command, CommandOutcome};

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::common::{load_settings, open_migrator};

/// Execute the create command
pub(crate) fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let kind = args
        .kind
        .map(Into::into)
        .unwrap_or(settings.config.default_kind);
    let migrator = open_migrator(&settings, false, false)?;

    let command = Command::Create {
        name: args.name.clone(),
        kind,
        sequential: args.sequential,
    };
    match migrator
        .run(command)
        .context("Failed to create migration")?
    {
        CommandOutcome::Created(path) => {
            println!("{}", path.display());
            Ok(())
        }
        other => anyhow::bail!("create returned an unexpected outcome: {other:?}"),
    }
}
