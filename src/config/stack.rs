//! The resolved per-invocation configuration handed to stack code

use crate::config::request::Module;
use crate::error::{ConfigurationError, ValidationError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Validated global and module configuration for one `(module, stage)`
///
/// Exactly one module document is present, and only for the requested
/// module. The others are absent from the serialised form rather than null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackConfig {
    stage: String,
    global_config: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fw_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vpc_config: Option<Value>,
}

impl StackConfig {
    pub(crate) fn new(stage: &str, global_config: Value, module: Module, document: Value) -> Self {
        let mut config = Self {
            stage: stage.to_owned(),
            global_config,
            app_config: None,
            fw_config: None,
            vpc_config: None,
        };
        match module {
            Module::Global => {}
            Module::App => config.app_config = Some(document),
            Module::Firewall => config.fw_config = Some(document),
            Module::Vpc => config.vpc_config = Some(document),
        }
        config
    }

    #[must_use]
    #[inline]
    pub fn stage(&self) -> &str {
        &self.stage
    }

    #[must_use]
    #[inline]
    pub const fn global_config(&self) -> &Value {
        &self.global_config
    }

    #[must_use]
    #[inline]
    pub const fn app_config(&self) -> Option<&Value> {
        self.app_config.as_ref()
    }

    #[must_use]
    #[inline]
    pub const fn fw_config(&self) -> Option<&Value> {
        self.fw_config.as_ref()
    }

    #[must_use]
    #[inline]
    pub const fn vpc_config(&self) -> Option<&Value> {
        self.vpc_config.as_ref()
    }

    /// The single populated module document, if a module was requested
    #[must_use]
    pub fn module_config(&self) -> Option<&Value> {
        self.app_config
            .as_ref()
            .or(self.fw_config.as_ref())
            .or(self.vpc_config.as_ref())
    }

    /// Deserialise the global document into a typed view
    ///
    /// # Errors
    ///
    /// Returns a `Parse` error if the document does not fit `T`
    pub fn global_as<T: DeserializeOwned>(&self) -> Result<T, ConfigurationError> {
        typed_view("globalConfig", &self.global_config)
    }

    /// Deserialise the module document into a typed view
    ///
    /// # Errors
    ///
    /// Returns a `Parse` error if no module document is present or it does
    /// not fit `T`
    pub fn module_as<T: DeserializeOwned>(&self) -> Result<T, ConfigurationError> {
        let document = self.module_config().ok_or_else(|| {
            ConfigurationError::parse(
                format!("No module configuration loaded for stage '{}'", self.stage),
                Vec::new(),
            )
        })?;
        typed_view("moduleConfig", document)
    }
}

fn typed_view<T: DeserializeOwned>(label: &str, document: &Value) -> Result<T, ConfigurationError> {
    serde_json::from_value(document.clone()).map_err(|e| {
        ConfigurationError::parse(
            format!("Failed to build typed view of {label}"),
            vec![ValidationError::new(label, e.to_string())],
        )
    })
}
