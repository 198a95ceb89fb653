//! In-memory parameter store for tests and local tooling

use super::{ParameterStore, RemoteError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Map-backed `ParameterStore`
///
/// A forced failure makes every read fail with the given error, which is how
/// tests simulate an unreachable service or missing credentials.
///
/// # Example
/// ```
/// use stackconf::remote::{InMemoryParameterStore, ParameterStore, RemoteError};
///
/// let store = InMemoryParameterStore::new().with_parameter("/ns/dev/app/config", "{}");
/// assert_eq!(store.get_parameter("/ns/dev/app/config").unwrap(), "{}");
///
/// let denied = InMemoryParameterStore::new().failing(RemoteError::access_denied("denied"));
/// assert!(denied.get_parameter("/ns/dev/app/config").is_err());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryParameterStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    parameters: HashMap<String, String>,
    failure: Option<RemoteError>,
    failures: HashMap<String, RemoteError>,
    reads: Vec<String>,
}

impl InMemoryParameterStore {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter (builder pattern)
    #[must_use]
    pub fn with_parameter<N: Into<String>, V: Into<String>>(self, name: N, value: V) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.parameters.insert(name.into(), value.into());
        }
        self
    }

    /// Make every read fail with `error` (builder pattern)
    #[must_use]
    pub fn failing(self, error: RemoteError) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.failure = Some(error);
        }
        self
    }

    /// Make reads of one parameter fail with `error` (builder pattern)
    #[must_use]
    pub fn failing_for<N: Into<String>>(self, name: N, error: RemoteError) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.failures.insert(name.into(), error);
        }
        self
    }

    /// Parameter names requested so far, in order
    #[must_use]
    pub fn reads(&self) -> Vec<String> {
        self.state
            .read()
            .map(|state| state.reads.clone())
            .unwrap_or_default()
    }
}

impl ParameterStore for InMemoryParameterStore {
    fn get_parameter(&self, name: &str) -> Result<String, RemoteError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| RemoteError::unreachable(e.to_string()))?;
        state.reads.push(name.to_owned());

        if let Some(failure) = state.failure.as_ref().or_else(|| state.failures.get(name)) {
            return Err(failure.clone());
        }

        state
            .parameters
            .get(name)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(name))
    }
}
