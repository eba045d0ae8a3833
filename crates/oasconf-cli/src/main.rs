//! # oasconf CLI entry point
//!
//! Parses command-line arguments and dispatches to the run handler.
//! Argument faults print usage to stderr and exit 1 before any network or
//! validation work happens.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use oasconf_cli::run::{run_conformance, RunArgs};

/// Real-world OpenAPI conformance harness.
///
/// Validates a sample of the public API corpus against the schema
/// validator, compares each failure with the accepted baseline, and flags
/// regressions. Long flags may be abbreviated to any unambiguous prefix.
#[derive(Parser, Debug)]
#[command(name = "oasconf", version, about, infer_long_args = true)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    run: RunArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too; only genuine argument
            // faults exit non-zero.
            let code = u8::from(err.use_stderr());
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    match run_conformance(&cli.run).await {
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

    #[test]
    fn recognizes_the_documented_flags_together() {
        let cli = Cli::try_parse_from(["oasconf", "--all", "--failedOnly"]).unwrap();
        assert!(cli.run.all);
        assert!(cli.run.failed_only);
    }

    #[test]
    fn long_flags_match_by_prefix() {
        let cli = Cli::try_parse_from(["oasconf", "--fail", "--al"]).unwrap();
        assert!(cli.run.failed_only);
        assert!(cli.run.all);
    }

    #[test]
    fn unrecognized_flag_is_an_argument_fault() {
        let err = Cli::try_parse_from(["oasconf", "--bogus"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn positional_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["oasconf", "petstore"]).is_err());
    }

    #[test]
    fn defaults_match_the_harness_contract() {
        let cli = Cli::try_parse_from(["oasconf"]).unwrap();
        assert!(!cli.run.all);
        assert!(!cli.run.failed_only);
        assert_eq!(cli.run.baseline, std::path::PathBuf::from("failed.json"));
        assert_eq!(cli.run.schemas, std::path::PathBuf::from("schemas"));
    }
}
