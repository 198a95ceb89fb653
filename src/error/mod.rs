//! Error handling module
//!
//! Defines the structured configuration error and its field-level entries

pub mod types;

pub use types::*;
