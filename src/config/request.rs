//! Configuration request types: which module, which stage

use crate::error::ConfigurationError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static STAGE_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$"));

/// A configuration domain: the global scope or one deployable module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Module {
    Global,
    App,
    Firewall,
    Vpc,
}

impl Module {
    /// Every deployable module, excluding the global scope
    pub const DEPLOYABLE: [Self; 3] = [Self::App, Self::Firewall, Self::Vpc];

    /// Token used in remote paths and as the module's directory name
    #[must_use]
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::App => "app",
            Self::Firewall => "fw",
            Self::Vpc => "vpc",
        }
    }

    /// Directory holding the module's `conf/`, `None` for the global scope
    #[must_use]
    #[inline]
    pub const fn directory(self) -> Option<&'static str> {
        match self {
            Self::Global => None,
            Self::App | Self::Firewall | Self::Vpc => Some(self.as_str()),
        }
    }

    /// Key under which the module document appears in a `StackConfig`
    #[must_use]
    #[inline]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Global => "globalConfig",
            Self::App => "appConfig",
            Self::Firewall => "fwConfig",
            Self::Vpc => "vpcConfig",
        }
    }
}

impl fmt::Display for Module {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "app" => Ok(Self::App),
            "fw" | "firewall" => Ok(Self::Firewall),
            "vpc" => Ok(Self::Vpc),
            other => Err(ConfigurationError::invalid_request(format!(
                "Unknown module '{other}'. Expected one of: global, app, fw, vpc"
            ))),
        }
    }
}

/// Explicit parameter object passed into every resolution call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRequest {
    module: Module,
    stage: String,
}

impl ConfigRequest {
    /// Build a request, rejecting stages that could escape the config tree
    ///
    /// # Errors
    ///
    /// Returns an `InvalidRequest` error if the stage is empty, contains a
    /// path separator, or contains characters outside `[A-Za-z0-9_-]`.
    #[inline]
    pub fn new<S: Into<String>>(module: Module, stage: S) -> Result<Self, ConfigurationError> {
        let stage = stage.into();
        validate_stage(&stage)?;
        Ok(Self { module, stage })
    }

    #[must_use]
    #[inline]
    pub const fn module(&self) -> Module {
        self.module
    }

    #[must_use]
    #[inline]
    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// The same stage, scoped to the global document
    #[must_use]
    #[inline]
    pub fn global(&self) -> Self {
        Self {
            module: Module::Global,
            stage: self.stage.clone(),
        }
    }
}

/// Validate a stage identifier
///
/// # Errors
///
/// Returns an `InvalidRequest` error when the stage is not a plain identifier
pub fn validate_stage(stage: &str) -> Result<(), ConfigurationError> {
    if stage.trim().is_empty() {
        return Err(ConfigurationError::invalid_request(
            "Stage cannot be empty",
        ));
    }

    if stage.contains('/') || stage.contains('\\') {
        return Err(ConfigurationError::invalid_request(format!(
            "Stage '{stage}' must not contain path separators"
        )));
    }

    let pattern = STAGE_PATTERN
        .as_ref()
        .map_err(|e| ConfigurationError::invalid_request(format!("Stage pattern is invalid: {e}")))?;
    if !pattern.is_match(stage) {
        return Err(ConfigurationError::invalid_request(format!(
            "Stage '{stage}' may only contain letters, digits, '-' and '_'"
        )));
    }

    Ok(())
}
