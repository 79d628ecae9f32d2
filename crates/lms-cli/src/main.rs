//! # lms CLI entry point
//!
//! Parses command-line arguments, loads the optional configuration file,
//! initializes logging and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lms_cli::access::{run_access, AccessArgs};
use lms_cli::config::{CliConfig, LogFormat};
use lms_cli::license::{run_license, LicenseArgs};
use lms_cli::validate::{run_validate, ValidateArgs};
use lms_cli::visible::{run_visible, VisibleArgs};

/// LMS courseware tooling.
///
/// Inspects merged group access of course blocks, validates group
/// references against the course's user partitions, and parses content
/// license codes.
#[derive(Parser, Debug)]
#[command(name = "lms", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print merged group access per block.
    Access(AccessArgs),

    /// Check group access references and block settings.
    Validate(ValidateArgs),

    /// Check whether a group can see a block.
    Visible(VisibleArgs),

    /// Parse a content license code.
    License(LicenseArgs),
}

fn init_tracing(verbose: u8, format: LogFormat) {
    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref());
    let log_format = config
        .as_ref()
        .map(|config| config.log_format)
        .unwrap_or_default();
    init_tracing(cli.verbose, log_format);

    tracing::debug!("lms CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = config.and_then(|config| match &cli.command {
        Commands::Access(args) => run_access(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Visible(args) => run_visible(args),
        Commands::License(args) => run_license(args, &config.license),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_cli::OutputFormat;

    #[test]
    fn cli_parse_access_all_blocks() {
        let cli = Cli::try_parse_from(["lms", "access", "course.yaml"]).unwrap();
        if let Commands::Access(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("course.yaml"));
            assert!(args.block.is_none());
            assert_eq!(args.format, OutputFormat::Text);
        } else {
            panic!("expected access subcommand");
        }
    }

    #[test]
    fn cli_parse_access_single_block_json() {
        let cli = Cli::try_parse_from([
            "lms",
            "access",
            "course.json",
            "--block",
            "week1",
            "--format",
            "json",
        ])
        .unwrap();
        if let Commands::Access(args) = cli.command {
            assert_eq!(args.block.as_deref(), Some("week1"));
            assert_eq!(args.format, OutputFormat::Json);
        } else {
            panic!("expected access subcommand");
        }
    }

    #[test]
    fn cli_parse_validate() {
        let cli = Cli::try_parse_from(["lms", "validate", "course.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn cli_parse_visible() {
        let cli = Cli::try_parse_from([
            "lms",
            "visible",
            "course.yaml",
            "--block",
            "lesson1",
            "--partition",
            "50",
            "--group",
            "2",
        ])
        .unwrap();
        if let Commands::Visible(args) = cli.command {
            assert_eq!(args.block, "lesson1");
            assert_eq!(args.partition, 50);
            assert_eq!(args.group, 2);
        } else {
            panic!("expected visible subcommand");
        }
    }

    #[test]
    fn cli_parse_visible_requires_numeric_ids() {
        let result = Cli::try_parse_from([
            "lms",
            "visible",
            "course.yaml",
            "--block",
            "lesson1",
            "--partition",
            "cohorts",
            "--group",
            "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_license_with_version() {
        let cli =
            Cli::try_parse_from(["lms", "license", "CC-BY-SA", "--version", "3.0"]).unwrap();
        if let Commands::License(args) = cli.command {
            assert_eq!(args.code, "CC-BY-SA");
            assert_eq!(args.license_version.as_deref(), Some("3.0"));
        } else {
            panic!("expected license subcommand");
        }
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli0 = Cli::try_parse_from(["lms", "license", "ARR"]).unwrap();
        assert_eq!(cli0.verbose, 0);

        let cli2 = Cli::try_parse_from(["lms", "-vv", "license", "ARR"]).unwrap();
        assert_eq!(cli2.verbose, 2);

        let cli3 = Cli::try_parse_from(["lms", "license", "ARR", "-vvv"]).unwrap();
        assert_eq!(cli3.verbose, 3);
    }

    #[test]
    fn cli_parse_config_option() {
        let cli = Cli::try_parse_from(["lms", "--config", "lms.yaml", "validate", "course.yaml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("lms.yaml")));
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["lms"]).is_err());
    }

    #[test]
    fn cli_parse_invalid_format_errors() {
        assert!(Cli::try_parse_from(["lms", "access", "course.yaml", "--format", "xml"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
