//! Configuration error types with exit codes

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

/// A single field-level diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Path into the document, e.g. `/us-east-1/vpc_id`
    pub field: String,

    /// Human-readable cause
    pub message: String,
}

impl ValidationError {
    #[inline]
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Category of a terminal configuration failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Neither the remote store nor the local file yielded a document
    SourceNotFound,
    /// A document exists but is not valid JSON (or not a JSON object)
    Parse,
    /// A document failed one or more schema constraints
    SchemaValidation,
    /// The schema itself could not be compiled
    SchemaCompile,
    /// A requested secret could not be read
    Secret,
    /// The module or stage token of a request is not acceptable
    InvalidRequest,
}

/// The single error type surfaced by every configuration operation
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ConfigurationError {
    kind: ErrorKind,
    message: String,
    errors: Vec<ValidationError>,
}

impl ConfigurationError {
    #[inline]
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S, errors: Vec<ValidationError>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors,
        }
    }

    /// Create a source-not-found error
    #[inline]
    pub fn source_not_found<S: Into<String>>(message: S, errors: Vec<ValidationError>) -> Self {
        Self::new(ErrorKind::SourceNotFound, message, errors)
    }

    /// Create a parse error
    #[inline]
    pub fn parse<S: Into<String>>(message: S, errors: Vec<ValidationError>) -> Self {
        Self::new(ErrorKind::Parse, message, errors)
    }

    /// Create a schema validation error
    #[inline]
    pub fn validation<S: Into<String>>(message: S, errors: Vec<ValidationError>) -> Self {
        Self::new(ErrorKind::SchemaValidation, message, errors)
    }

    /// Create a schema compile error
    #[inline]
    pub fn schema_compile<S: Into<String>>(message: S, errors: Vec<ValidationError>) -> Self {
        Self::new(ErrorKind::SchemaCompile, message, errors)
    }

    /// Create a secret error
    #[inline]
    pub fn secret<S: Into<String>>(message: S, errors: Vec<ValidationError>) -> Self {
        Self::new(ErrorKind::Secret, message, errors)
    }

    /// Create an invalid request error
    #[inline]
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::InvalidRequest, message, Vec::new())
    }

    /// Prefix the top-level message, keeping the kind and field errors
    #[must_use]
    pub fn in_context<S: AsRef<str>>(mut self, context: S) -> Self {
        self.message = format!("{}: {}", context.as_ref(), self.message);
        self
    }

    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    #[inline]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Render the multi-line report printed by deployment entry points
    ///
    /// The first line is the top-level message. When field errors are present
    /// it is followed by `Validation errors:` and one `<field>: <message>` line
    /// per error, in the order they were collected.
    #[must_use]
    pub fn detailed_message(&self) -> String {
        let mut out = self.message.clone();
        if self.errors.is_empty() {
            return out;
        }

        out.push_str("\nValidation errors:");
        for error in &self.errors {
            let _ = write!(out, "\n  {}: {}", error.field, error.message);
        }
        out
    }

    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::SchemaValidation => 1,
            ErrorKind::SourceNotFound => 2,
            ErrorKind::Parse => 3,
            ErrorKind::SchemaCompile => 4,
            ErrorKind::Secret => 5,
            ErrorKind::InvalidRequest => 6,
        }
    }
}
