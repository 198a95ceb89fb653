//! Remote parameter store abstraction
//!
//! The store is an external key-value read service. Every failure to read a
//! parameter is reported as a `RemoteError`; the resolver treats all of them
//! as a trigger for falling back to local files.

pub mod aws_cli;
pub mod memory;

pub use aws_cli::AwsCliParameterStore;
pub use memory::InMemoryParameterStore;

use std::time::Duration;
use thiserror::Error;

/// Failure to read a parameter from the remote store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RemoteError {
    /// The service could not be reached
    #[error("parameter store unreachable: {message}")]
    Unreachable { message: String },

    /// Credentials are missing or lack permission
    #[error("access denied: {message}")]
    AccessDenied { message: String },

    /// The parameter does not exist
    #[error("parameter not found: {name}")]
    NotFound { name: String },

    /// The read did not complete within the configured timeout
    #[error("timed out after {timeout:?} reading {name}")]
    Timeout { name: String, timeout: Duration },

    /// The store answered with something that is not a parameter value
    #[error("malformed response for {name}: {message}")]
    Malformed { name: String, message: String },
}

impl RemoteError {
    #[inline]
    pub fn unreachable<S: Into<String>>(message: S) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    #[inline]
    pub fn access_denied<S: Into<String>>(message: S) -> Self {
        Self::AccessDenied {
            message: message.into(),
        }
    }

    #[inline]
    pub fn not_found<S: Into<String>>(name: S) -> Self {
        Self::NotFound { name: name.into() }
    }
}

/// Read-only access to a remote key-value parameter store
pub trait ParameterStore: Send + Sync {
    /// Read a single parameter value by its full path
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` describing why the value could not be read
    fn get_parameter(&self, name: &str) -> Result<String, RemoteError>;
}

/// A store that is never reachable, for runs without credentials
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineParameterStore;

impl ParameterStore for OfflineParameterStore {
    #[inline]
    fn get_parameter(&self, _name: &str) -> Result<String, RemoteError> {
        Err(RemoteError::unreachable("offline mode, no credentials configured"))
    }
}

