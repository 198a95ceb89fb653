//! Command-line interface module
//!
//! Handles argument parsing for the deployment entry point

pub mod args;

pub use args::*;
