use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_parse_up_to_with_flags() {
    let cli = Cli::try_parse_from(["tern", "--dir", "db/migrations", "up-to", "42", "--dry-run"])
        .unwrap();
    assert_eq!(cli.global.dir.as_deref(), Some("db/migrations"));
    match cli.command {
        Commands::UpTo(args) => {
            assert_eq!(args.version, 42);
            assert!(args.up.run.dry_run);
            assert!(!args.up.include_missing);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_create_kind() {
    let cli = Cli::try_parse_from(["tern", "create", "add_users", "rs", "--sequential"]).unwrap();
    match cli.command {
        Commands::Create(args) => {
            assert_eq!(args.name, "add_users");
            assert_eq!(args.kind, Some(KindArg::Rs));
            assert!(args.sequential);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_status_json() {
    let cli = Cli::try_parse_from(["tern", "status", "--unapplied-only", "-o", "json"]).unwrap();
    match cli.command {
        Commands::Status(args) => {
            assert!(args.unapplied_only);
            assert_eq!(args.output, StatusOutput::Json);
        }
        other => panic!("unexpected command {other:?}"),
    }
}
