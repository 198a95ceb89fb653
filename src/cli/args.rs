use crate::config::{ConfigRequest, DEFAULT_NAMESPACE, ManagerOptions, Module};
use crate::error::ConfigurationError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments for stackconf
#[derive(Parser, Debug, Clone)]
#[command(name = "stackconf")]
#[command(about = "Resolve, validate and merge deployment configuration for a module and stage")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Module to load: global, app, fw or vpc
    #[arg(long, value_name = "MODULE", default_value = "global")]
    pub module: String,

    /// Deployment stage, e.g. dev or prod
    #[arg(long, value_name = "STAGE", required_unless_present = "secrets")]
    pub stage: Option<String>,

    /// Directory containing conf/ and the module directories
    #[arg(long, value_name = "PATH", env = "STACKCONF_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// First segment of remote parameter paths
    #[arg(long, value_name = "NAMESPACE", env = "STACKCONF_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Merge the module's override layer on top of its configuration
    #[arg(long)]
    pub overrides: bool,

    /// Skip the remote parameter store and read local files only
    #[arg(long)]
    pub offline: bool,

    /// Region passed to the parameter store client
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Credentials profile passed to the parameter store client
    #[arg(long, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Seconds to wait for a single remote read
    #[arg(long, value_name = "SECONDS", default_value_t = 10)]
    pub timeout: u64,

    /// Read these parameters as secrets instead of loading configuration
    /// (can be specified multiple times)
    #[arg(long = "secret", value_name = "PATH")]
    pub secrets: Vec<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the configuration request from `--module` and `--stage`
    ///
    /// # Errors
    ///
    /// Returns an `InvalidRequest` error for an unknown module, a missing
    /// stage or a bad stage
    pub fn request(&self) -> Result<ConfigRequest, ConfigurationError> {
        let module: Module = self.module.parse()?;
        let stage = self
            .stage
            .clone()
            .ok_or_else(|| ConfigurationError::invalid_request("A --stage is required to load configuration"))?;
        ConfigRequest::new(module, stage)
    }

    #[must_use]
    pub fn manager_options(&self) -> ManagerOptions {
        ManagerOptions {
            namespace: self.namespace.clone(),
            root: self.root.clone(),
        }
    }

    #[must_use]
    #[inline]
    pub const fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
