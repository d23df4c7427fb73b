use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{CacheCommands, Commands};

/// Top-level CLI parser for the `lode` binary.
#[derive(Debug, Parser)]
#[command(
    name = "lode",
    version,
    about = "Lodestar - commercial research for pharma assets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only, no spinner)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use lode_core::{DevelopmentStage, Geography};
    use pretty_assertions::assert_eq;

    use super::{CacheCommands, Cli, Commands, OutputFormat};

    const RESEARCH: [&str; 11] = [
        "lode",
        "research",
        "--area",
        "Oncology",
        "--indication",
        "X",
        "--target",
        "Y",
        "--stage",
        "Phase 3",
        "--full",
    ];

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn research_args_build_a_spec() {
        let cli = Cli::try_parse_from(RESEARCH).expect("cli should parse");
        let Commands::Research(args) = cli.command else {
            panic!("expected research");
        };
        assert!(!args.no_cache);
        let spec = args.request.to_spec().unwrap();
        assert_eq!(spec.stage(), DevelopmentStage::Phase3);
        assert_eq!(spec.geography(), Geography::Global);
        assert!(spec.full_research());
    }

    #[test]
    fn unknown_stage_is_a_client_error() {
        let cli = Cli::try_parse_from([
            "lode",
            "fingerprint",
            "--area",
            "Oncology",
            "--indication",
            "X",
            "--target",
            "Y",
            "--stage",
            "Phase 4",
        ])
        .expect("cli should parse");
        let Commands::Fingerprint(args) = cli.command else {
            panic!("expected fingerprint");
        };
        assert!(args.to_spec().is_err());
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["lode", "audit", "--limit", "5", "--format", "raw", "-q"])
            .expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Audit(ref a) if a.limit == 5));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["lode", "-q", "-v", "audit"]).is_err());
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["lode", "--format", "table", "audit"]).is_err());
    }

    #[test]
    fn cache_purge_parses() {
        let cli =
            Cli::try_parse_from(["lode", "cache", "purge", "--all"]).expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Cache {
                action: CacheCommands::Purge { all: true }
            }
        ));
    }
}
