//! # `stackconf`
//!
//! Deployment entry point that resolves the configuration for one module and
//! stage and prints it as JSON for the stack-composition code.
//!
//! ## Usage
//!
//! ```sh
//! stackconf --module app --stage dev
//! stackconf --module vpc --stage prod --overrides --region us-east-1
//! stackconf --stage dev --secret /stackconf/dev/app/api-key
//! ```
//!
//! Configuration is read from the remote parameter store first and from
//! `conf/<stage>.json` / `<module>/conf/<stage>.json` when the store cannot
//! be read. Any configuration failure prints a field-level report and exits
//! with a non-zero status.

use anyhow::Result;
use clap::Parser as _;
use stackconf::cli::Args;
use stackconf::error::ConfigurationError;
use stackconf::system::real::RealSystem;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber based on verbose flag
    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // Logs go to stderr so stdout carries only the JSON document
    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let system = RealSystem::new();
    match stackconf::run(&args, &system) {
        Ok(()) => std::process::exit(0),
        Err(err) => match err.downcast_ref::<ConfigurationError>() {
            Some(config_err) => {
                eprintln!("{}", config_err.detailed_message());
                std::process::exit(config_err.exit_code());
            }
            None => {
                error!("{}", err);
                std::process::exit(1);
            }
        },
    }
}
