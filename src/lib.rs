//! `stackconf` - deployment configuration resolution for infrastructure stacks
//!
//! This library locates configuration for a `(module, stage)` pair in a
//! remote parameter store, falls back to local JSON files when the store
//! cannot be read, validates every document against its JSON schema and
//! merges environment-specific override layers.

pub mod cli;
pub mod config;
pub mod error;
pub mod remote;
pub mod system;
pub mod utils;

use anyhow::{Context as _, Result};
use cli::Args;
use config::ConfigManager;
use remote::{AwsCliParameterStore, OfflineParameterStore, ParameterStore};
use system::System;

/// Main entry point for the stackconf library
///
/// Prints the resolved `StackConfig`, or the requested secrets, as JSON.
pub fn run(args: &Args, system: &dyn System) -> Result<()> {
    let store: Box<dyn ParameterStore> = if args.offline {
        Box::new(OfflineParameterStore)
    } else {
        Box::new(
            AwsCliParameterStore::new()
                .with_region(args.region.clone())
                .with_profile(args.profile.clone())
                .with_timeout(args.remote_timeout()),
        )
    };

    let manager = ConfigManager::new(system, store.as_ref(), args.manager_options());

    let output = if args.secrets.is_empty() {
        let request = args.request()?;
        let stack = if args.overrides {
            manager.load_config_with_overrides(&request)?
        } else {
            manager.load_config(&request)?
        };
        serde_json::to_string_pretty(&stack)
    } else {
        let secrets = manager.get_secrets(&args.secrets)?;
        serde_json::to_string_pretty(&secrets)
    }
    .context("Failed to serialize output")?;

    // Output to stdout (not using logging)
    println!("{output}");

    Ok(())
}
