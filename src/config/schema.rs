//! JSON Schema validation for configuration documents
//!
//! Schemas are draft-07 documents. Validation never stops at the first
//! violation: every error reported by the compiled validator is turned into a
//! `ValidationError` with a JSON-pointer field path.

use crate::error::{ConfigurationError, ValidationError};
use crate::system::System;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Validator};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Outcome of validating one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    #[must_use]
    #[inline]
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// A schema compiled once and usable for any number of documents
pub struct CompiledSchema {
    validator: Validator,
}

impl CompiledSchema {
    /// Compile a draft-07 schema
    ///
    /// # Errors
    ///
    /// Returns a `SchemaCompile` error if the schema is malformed, for
    /// example when a `pattern` holds an invalid regular expression.
    pub fn compile(schema: &Value) -> Result<Self, ConfigurationError> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .build(schema)
            .map_err(|e| {
                ConfigurationError::schema_compile(
                    "Failed to compile JSON schema",
                    vec![ValidationError::new(
                        display_path(&e.schema_path.to_string()),
                        e.to_string(),
                    )],
                )
            })?;

        Ok(Self { validator })
    }

    /// Check a document and collect every violation
    #[must_use]
    pub fn validate(&self, document: &Value) -> ValidationResult {
        let mut errors = Vec::new();

        for error in self.validator.iter_errors(document) {
            let path = error.instance_path.to_string();
            match &error.kind {
                ValidationErrorKind::Required { property } => {
                    let name = property
                        .as_str()
                        .map_or_else(|| property.to_string(), str::to_owned);
                    errors.push(ValidationError::new(
                        join_pointer(&path, &name),
                        format!("Missing required property: {name}"),
                    ));
                }
                ValidationErrorKind::Pattern { pattern } => {
                    errors.push(ValidationError::new(
                        display_path(&path),
                        format!("{} does not match required pattern '{pattern}'", error.instance),
                    ));
                }
                ValidationErrorKind::Enum { options } => {
                    errors.push(ValidationError::new(
                        display_path(&path),
                        format!("must be equal to one of the allowed values: {options}"),
                    ));
                }
                ValidationErrorKind::PropertyNames { error: key_error } => {
                    let key = key_error
                        .instance
                        .as_str()
                        .map_or_else(|| key_error.instance.to_string(), str::to_owned);
                    let message = match &key_error.kind {
                        ValidationErrorKind::Pattern { pattern } => {
                            format!("Property name '{key}' does not match required pattern '{pattern}'")
                        }
                        _ => format!("Property name '{key}' is invalid: {key_error}"),
                    };
                    errors.push(ValidationError::new(join_pointer(&path, &key), message));
                }
                ValidationErrorKind::AdditionalProperties { unexpected } => {
                    for name in unexpected {
                        errors.push(ValidationError::new(
                            join_pointer(&path, name),
                            format!("Unexpected additional property: {name}"),
                        ));
                    }
                }
                _ => {
                    errors.push(ValidationError::new(display_path(&path), error.to_string()));
                }
            }
        }

        ValidationResult::from_errors(errors)
    }
}

/// Validate a document against a schema in one step
///
/// # Errors
///
/// Returns a `SchemaCompile` error if the schema cannot be compiled.
/// Violations in the document itself are reported in the `ValidationResult`.
#[inline]
pub fn validate(document: &Value, schema: &Value) -> Result<ValidationResult, ConfigurationError> {
    Ok(CompiledSchema::compile(schema)?.validate(document))
}

/// Read and parse a schema file from disk
///
/// # Errors
///
/// Returns `SourceNotFound` if the file is missing and `Parse` if it is not
/// valid JSON.
pub fn load_schema(system: &dyn System, path: &Path) -> Result<Value, ConfigurationError> {
    if !system.is_file(path).unwrap_or(false) {
        return Err(ConfigurationError::source_not_found(
            format!("Schema file not found: {}", path.display()),
            Vec::new(),
        ));
    }

    let content = system.read_to_string(path).map_err(|e| {
        ConfigurationError::parse(
            format!("Failed to read schema file: {}", path.display()),
            vec![ValidationError::new(path.display().to_string(), e.to_string())],
        )
    })?;

    serde_json::from_str(&content).map_err(|e| {
        ConfigurationError::parse(
            format!("Failed to parse JSON schema in file: {}", path.display()),
            vec![ValidationError::new(path.display().to_string(), e.to_string())],
        )
    })
}

/// Append a property name to a JSON pointer, escaping per RFC 6901
fn join_pointer(base: &str, name: &str) -> String {
    let escaped = name.replace('~', "~0").replace('/', "~1");
    format!("{base}/{escaped}")
}

/// The document root is shown as `/` rather than an empty string
fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_owned()
    } else {
        path.to_owned()
    }
}
