//! System abstraction for filesystem reads
//!
//! Configuration and schema files are read through this trait so that the
//! resolver can be exercised against an in-memory tree in tests.

use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Unified trait for the filesystem operations the resolver needs
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::fs`
/// - `MockSystem`: Test implementation using in-memory storage
pub trait System: Send + Sync {
    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if a path points to a file
    fn is_file(&self, path: &Path) -> io::Result<bool>;
}
