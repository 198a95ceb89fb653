//! Deterministic locations of configuration documents
//!
//! Remote parameters and local files mirror the same hierarchy:
//!
//! | document            | remote parameter                      | local file                             |
//! |---------------------|---------------------------------------|----------------------------------------|
//! | global config       | `/<ns>/<stage>/global/config`         | `conf/<stage>.json`                    |
//! | module config       | `/<ns>/<stage>/<module>/config`       | `<module>/conf/<stage>.json`           |
//! | module overrides    | `/<ns>/<stage>/<module>/overrides`    | `<module>/conf/<stage>-overrides.json` |
//!
//! Schemas live next to the documents as `conf/schema.json` and
//! `<module>/conf/schema.json` and are only ever read from disk.

use crate::config::request::{ConfigRequest, Module};
use std::path::{Path, PathBuf};

const CONF_DIR: &str = "conf";
const SCHEMA_FILE: &str = "schema.json";

/// Which document of a module is being located
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Config,
    Overrides,
}

impl DocumentKind {
    #[must_use]
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Overrides => "overrides",
        }
    }
}

/// Remote parameter path for a document
#[must_use]
pub fn remote_path(namespace: &str, request: &ConfigRequest, kind: DocumentKind) -> String {
    let namespace = namespace.trim_matches('/');
    format!(
        "/{namespace}/{}/{}/{}",
        request.stage(),
        request.module().as_str(),
        kind.as_str()
    )
}

/// Local file path for a document, relative to `root`
#[must_use]
pub fn local_path(root: &Path, request: &ConfigRequest, kind: DocumentKind) -> PathBuf {
    let file_name = match kind {
        DocumentKind::Config => format!("{}.json", request.stage()),
        DocumentKind::Overrides => format!("{}-overrides.json", request.stage()),
    };
    conf_dir(root, request.module()).join(file_name)
}

/// Schema file path for a module, relative to `root`
#[must_use]
pub fn schema_path(root: &Path, module: Module) -> PathBuf {
    conf_dir(root, module).join(SCHEMA_FILE)
}

fn conf_dir(root: &Path, module: Module) -> PathBuf {
    match module.directory() {
        Some(dir) => root.join(dir).join(CONF_DIR),
        None => root.join(CONF_DIR),
    }
}
