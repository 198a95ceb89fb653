//! Configuration management module
//!
//! Locates configuration documents in the remote parameter store or on disk,
//! validates them against per-module JSON schemas and merges override layers.

pub mod manager;
pub mod merge;
pub mod request;
pub mod resolver;
pub mod schema;
pub mod stack;

pub use manager::{ConfigManager, DEFAULT_NAMESPACE, ManagerOptions};
pub use merge::{merge, merge_all};
pub use request::{ConfigRequest, Module};
pub use resolver::{DocumentSource, ResolvedDocument, SourceResolver};
pub use schema::{CompiledSchema, ValidationResult, validate};
pub use stack::StackConfig;
