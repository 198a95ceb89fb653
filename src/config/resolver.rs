//! Source resolution: remote parameter first, local file as fallback

use crate::config::request::ConfigRequest;
use crate::error::{ConfigurationError, ValidationError};
use crate::remote::{ParameterStore, RemoteError};
use crate::system::System;
use crate::utils::path::{DocumentKind, local_path, remote_path};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where a resolved document came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Remote(String),
    Local(PathBuf),
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(path) => write!(f, "remote parameter {path}"),
            Self::Local(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// A raw document, parsed but not yet schema-checked
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    pub value: Value,
    pub source: DocumentSource,
}

/// Outcome of trying both sources
enum Attempt {
    Found(ResolvedDocument),
    Missing {
        remote_path: String,
        remote_error: RemoteError,
        local_path: PathBuf,
    },
}

/// Locates and reads the raw document for a request
pub struct SourceResolver<'a> {
    system: &'a dyn System,
    store: &'a dyn ParameterStore,
    namespace: &'a str,
    root: &'a Path,
}

impl<'a> SourceResolver<'a> {
    #[must_use]
    #[inline]
    pub fn new(
        system: &'a dyn System,
        store: &'a dyn ParameterStore,
        namespace: &'a str,
        root: &'a Path,
    ) -> Self {
        Self {
            system,
            store,
            namespace,
            root,
        }
    }

    /// Resolve a document that must exist
    ///
    /// # Errors
    ///
    /// - `SourceNotFound` naming both the remote path and the file path when
    ///   neither source has the document
    /// - `Parse` when the local file is not a JSON object
    pub fn resolve(
        &self,
        request: &ConfigRequest,
        kind: DocumentKind,
    ) -> Result<ResolvedDocument, ConfigurationError> {
        match self.attempt(request, kind)? {
            Attempt::Found(document) => Ok(document),
            Attempt::Missing {
                remote_path,
                remote_error,
                local_path,
            } => Err(ConfigurationError::source_not_found(
                format!(
                    "No {} found for module '{}' in stage '{}'",
                    kind.as_str(),
                    request.module(),
                    request.stage()
                ),
                vec![
                    ValidationError::new(remote_path, remote_error.to_string()),
                    ValidationError::new(
                        local_path.display().to_string(),
                        "file does not exist",
                    ),
                ],
            )),
        }
    }

    /// Resolve a document that may legitimately be absent, such as an
    /// override layer
    ///
    /// # Errors
    ///
    /// Returns `Parse` when the local file exists but is not a JSON object
    pub fn resolve_optional(
        &self,
        request: &ConfigRequest,
        kind: DocumentKind,
    ) -> Result<Option<ResolvedDocument>, ConfigurationError> {
        match self.attempt(request, kind)? {
            Attempt::Found(document) => Ok(Some(document)),
            Attempt::Missing { local_path, .. } => {
                debug!("No {} document at {}", kind.as_str(), local_path.display());
                Ok(None)
            }
        }
    }

    fn attempt(
        &self,
        request: &ConfigRequest,
        kind: DocumentKind,
    ) -> Result<Attempt, ConfigurationError> {
        let remote_path = remote_path(self.namespace, request, kind);

        let remote_error = match self.read_remote(&remote_path) {
            Ok(value) => {
                debug!("Loaded {} from remote parameter {}", kind.as_str(), remote_path);
                return Ok(Attempt::Found(ResolvedDocument {
                    value,
                    source: DocumentSource::Remote(remote_path),
                }));
            }
            Err(err) => err,
        };

        let local_path = local_path(self.root, request, kind);
        info!(
            "Could not read remote parameter {} ({}), falling back to {}",
            remote_path,
            remote_error,
            local_path.display()
        );

        match self.read_local(&local_path)? {
            Some(value) => {
                debug!("Loaded {} from {}", kind.as_str(), local_path.display());
                Ok(Attempt::Found(ResolvedDocument {
                    value,
                    source: DocumentSource::Local(local_path),
                }))
            }
            None => Ok(Attempt::Missing {
                remote_path,
                remote_error,
                local_path,
            }),
        }
    }

    fn read_remote(&self, name: &str) -> Result<Value, RemoteError> {
        let raw = self.store.get_parameter(name)?;

        let value: Value = serde_json::from_str(&raw).map_err(|e| {
            warn!("Remote parameter {} is not valid JSON", name);
            RemoteError::Malformed {
                name: name.to_owned(),
                message: e.to_string(),
            }
        })?;

        if !value.is_object() {
            warn!("Remote parameter {} is not a JSON object", name);
            return Err(RemoteError::Malformed {
                name: name.to_owned(),
                message: "expected a JSON object".to_owned(),
            });
        }

        Ok(value)
    }

    fn read_local(&self, path: &Path) -> Result<Option<Value>, ConfigurationError> {
        if !self.system.is_file(path).unwrap_or(false) {
            return Ok(None);
        }

        let content = self.system.read_to_string(path).map_err(|e| {
            ConfigurationError::parse(
                format!("Failed to read configuration file: {}", path.display()),
                vec![ValidationError::new(path.display().to_string(), e.to_string())],
            )
        })?;

        let value: Value = serde_json::from_str(&content).map_err(|e| {
            ConfigurationError::parse(
                format!("Failed to parse JSON configuration in file: {}", path.display()),
                vec![ValidationError::new(path.display().to_string(), e.to_string())],
            )
        })?;

        if !value.is_object() {
            return Err(ConfigurationError::parse(
                format!("Configuration file is not a JSON object: {}", path.display()),
                vec![ValidationError::new(
                    path.display().to_string(),
                    "top-level value must be an object",
                )],
            ));
        }

        Ok(Some(value))
    }
}
