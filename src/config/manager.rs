//! Configuration manager: the entry point used by deployment scripts

use crate::config::merge;
use crate::config::request::{ConfigRequest, Module};
use crate::config::resolver::SourceResolver;
use crate::config::schema::{self, CompiledSchema, ValidationResult};
use crate::config::stack::StackConfig;
use crate::error::{ConfigurationError, ValidationError};
use crate::remote::ParameterStore;
use crate::system::System;
use crate::utils::path::{DocumentKind, schema_path};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default remote namespace, the first segment of every parameter path
pub const DEFAULT_NAMESPACE: &str = "stackconf";

/// Where configuration lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    /// First segment of remote parameter paths
    pub namespace: String,

    /// Directory containing `conf/` and the module directories
    pub root: PathBuf,
}

impl Default for ManagerOptions {
    #[inline]
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_owned(),
            root: PathBuf::from("."),
        }
    }
}

/// Resolves, validates and merges configuration
///
/// Holds no cache: every call reads its sources fresh, so independent calls
/// for different modules or stages share no mutable state.
pub struct ConfigManager<'a> {
    system: &'a dyn System,
    store: &'a dyn ParameterStore,
    options: ManagerOptions,
}

impl<'a> ConfigManager<'a> {
    #[must_use]
    #[inline]
    pub fn new(system: &'a dyn System, store: &'a dyn ParameterStore, options: ManagerOptions) -> Self {
        Self {
            system,
            store,
            options,
        }
    }

    /// Load and validate the global and module documents for a request
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` when a document cannot be located or
    /// parsed, when a schema cannot be loaded or compiled, or when either
    /// document violates its schema. Validation errors from both documents
    /// are reported together.
    pub fn load_config(&self, request: &ConfigRequest) -> Result<StackConfig, ConfigurationError> {
        self.load(request, false)
    }

    /// Like `load_config`, with the module's override layer merged on top
    /// of its base document before validation
    ///
    /// A missing override layer is not an error.
    ///
    /// # Errors
    ///
    /// Same as `load_config`; an override file that exists but does not
    /// parse is also an error.
    pub fn load_config_with_overrides(
        &self,
        request: &ConfigRequest,
    ) -> Result<StackConfig, ConfigurationError> {
        self.load(request, true)
    }

    /// Validate a document against a schema
    ///
    /// # Errors
    ///
    /// Returns a `SchemaCompile` error if the schema is malformed
    #[inline]
    pub fn validate_config(
        &self,
        document: &Value,
        schema: &Value,
    ) -> Result<ValidationResult, ConfigurationError> {
        schema::validate(document, schema)
    }

    /// Merge an override document on top of a base document
    #[must_use]
    #[inline]
    pub fn merge_configs(&self, base: &Value, overlay: &Value) -> Value {
        merge::merge(base, overlay)
    }

    /// Read several remote parameters at once
    ///
    /// Either every path is read or the call fails; a partial map is never
    /// returned. Values are never logged.
    ///
    /// # Errors
    ///
    /// Returns a `Secret` error naming the first path that could not be read
    pub fn get_secrets<I, S>(&self, paths: I) -> Result<BTreeMap<String, String>, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut secrets = BTreeMap::new();

        for path in paths {
            let path = path.as_ref();
            let value = self.store.get_parameter(path).map_err(|e| {
                ConfigurationError::secret(
                    format!("Failed to read secret parameter {path}"),
                    vec![ValidationError::new(path, e.to_string())],
                )
            })?;
            debug!("Read secret parameter {}", path);
            secrets.insert(path.to_owned(), value);
        }

        Ok(secrets)
    }

    fn load(
        &self,
        request: &ConfigRequest,
        with_overrides: bool,
    ) -> Result<StackConfig, ConfigurationError> {
        let (root, global, module_document) = self
            .resolve_documents(request, with_overrides)
            .map_err(|e| e.in_context(load_context(request)))?;
        self.validated(request, &root, global, module_document)
    }

    /// Locate and parse the global and module documents, applying override
    /// layers when requested
    fn resolve_documents(
        &self,
        request: &ConfigRequest,
        with_overrides: bool,
    ) -> Result<(PathBuf, Value, Option<Value>), ConfigurationError> {
        let root = self.root()?;
        let resolver = SourceResolver::new(self.system, self.store, &self.options.namespace, &root);
        let module = request.module();

        let global_request = request.global();
        let global = resolver.resolve(&global_request, DocumentKind::Config)?.value;
        let global = if with_overrides && module == Module::Global {
            Self::apply_overrides(&resolver, &global_request, global)?
        } else {
            global
        };

        let module_document = match module {
            Module::Global => None,
            _ => {
                let base = resolver.resolve(request, DocumentKind::Config)?.value;
                Some(if with_overrides {
                    Self::apply_overrides(&resolver, request, base)?
                } else {
                    base
                })
            }
        };

        Ok((root, global, module_document))
    }

    fn validated(
        &self,
        request: &ConfigRequest,
        root: &Path,
        global: Value,
        module_document: Option<Value>,
    ) -> Result<StackConfig, ConfigurationError> {
        let module = request.module();
        let mut errors = self
            .check(root, Module::Global, &global)
            .map_err(|e| e.in_context(load_context(request)))?;
        if let Some(document) = module_document.as_ref() {
            errors.extend(
                self.check(root, module, document)
                    .map_err(|e| e.in_context(load_context(request)))?,
            );
        }

        if !errors.is_empty() {
            return Err(ConfigurationError::validation(
                format!(
                    "Invalid configuration for module '{}' in stage '{}'",
                    module,
                    request.stage()
                ),
                errors,
            ));
        }

        info!(
            "Loaded configuration for module '{}' in stage '{}'",
            module,
            request.stage()
        );

        Ok(StackConfig::new(
            request.stage(),
            global,
            module,
            module_document.unwrap_or(Value::Null),
        ))
    }

    fn apply_overrides(
        resolver: &SourceResolver<'_>,
        request: &ConfigRequest,
        base: Value,
    ) -> Result<Value, ConfigurationError> {
        match resolver.resolve_optional(request, DocumentKind::Overrides)? {
            Some(overrides) => {
                info!("Applying overrides from {}", overrides.source);
                Ok(merge::merge(&base, &overrides.value))
            }
            None => Ok(base),
        }
    }

    /// Validate one document against its module schema, labelling each
    /// field with the module it belongs to
    fn check(
        &self,
        root: &Path,
        module: Module,
        document: &Value,
    ) -> Result<Vec<ValidationError>, ConfigurationError> {
        let schema = schema::load_schema(self.system, &schema_path(root, module))?;
        let result = CompiledSchema::compile(&schema)?.validate(document);

        Ok(result
            .errors
            .into_iter()
            .map(|error| ValidationError::new(format!("{module}:{}", error.field), error.message))
            .collect())
    }

    fn root(&self) -> Result<PathBuf, ConfigurationError> {
        if self.options.root.is_absolute() {
            return Ok(self.options.root.clone());
        }

        let cwd = self.system.current_dir().map_err(|e| {
            ConfigurationError::source_not_found(
                "Failed to determine the current directory",
                vec![ValidationError::new(
                    self.options.root.display().to_string(),
                    e.to_string(),
                )],
            )
        })?;
        if self.options.root == Path::new(".") {
            return Ok(cwd);
        }
        Ok(cwd.join(&self.options.root))
    }
}

fn load_context(request: &ConfigRequest) -> String {
    format!(
        "Failed to load configuration for module '{}' in stage '{}'",
        request.module(),
        request.stage()
    )
}
