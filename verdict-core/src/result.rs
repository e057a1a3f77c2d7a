// Validation outcomes: the untyped evaluation and the typed result

use serde_json::{Map, Value, json};

use crate::errors::Errors;

/// Untyped outcome of evaluating a payload against a schema: the error map
/// plus the record of accepted values (and schema defaults for untouched
/// fields) that materialization decodes.
#[derive(Debug, Clone)]
pub struct Evaluation {
    errors: Errors,
    record: Map<String, Value>,
}

impl Evaluation {
    pub(crate) fn new(errors: Errors, record: Map<String, Value>) -> Self {
        Self { errors, record }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    pub fn into_errors(self) -> Errors {
        self.errors
    }

    pub(crate) fn into_record(self) -> Map<String, Value> {
        self.record
    }
}

/// Immutable outcome of a typed validation.
///
/// The materialized instance is present iff the error map is empty; a single
/// field error anywhere voids materialization entirely.
#[derive(Debug, Clone)]
pub struct ValidationResult<T> {
    message: String,
    errors: Errors,
    data: Option<T>,
}

impl<T> ValidationResult<T> {
    pub(crate) fn valid(message: String, data: T) -> Self {
        Self {
            message,
            errors: Errors::new(),
            data: Some(data),
        }
    }

    pub(crate) fn invalid(message: String, errors: Errors) -> Self {
        Self {
            message,
            errors,
            data: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The schema-level message (configured override or the generic default).
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// The `{"message": ..., "errors": ...}` envelope an HTTP layer returns
    /// on invalid payloads.
    pub fn error_body(&self) -> Value {
        json!({
            "message": &self.message,
            "errors": &self.errors,
        })
    }
}
