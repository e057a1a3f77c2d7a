// Rule catalog: the closed set of constraint kinds and their messages

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::errors::{ConfigurationError, Result};
use crate::schema::Schema;
use crate::traits::{Validatable, schema_of};

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required.";
pub(crate) const DEFAULT_SCHEMA_MESSAGE: &str = "Invalid request payload";

/// Lazy handle to a nested schema.
///
/// Resolution goes through the per-type cache at validation time, so
/// mutually recursive schemas stay constructible; the engine's depth limit
/// bounds the recursion.
#[derive(Clone)]
pub struct SchemaRef {
    target: &'static str,
    resolve: fn() -> Result<Arc<Schema>>,
}

impl SchemaRef {
    pub fn of<T: Validatable>() -> Self {
        Self {
            target: std::any::type_name::<T>(),
            resolve: schema_of::<T>,
        }
    }

    /// Type name of the referenced target, for diagnostics.
    pub fn target(&self) -> &'static str {
        self.target
    }

    pub(crate) fn resolve(&self) -> Result<Arc<Schema>> {
        (self.resolve)()
    }
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SchemaRef").field(&self.target).finish()
    }
}

/// One constraint kind with its parameters and pre-resolved message.
///
/// Message placeholders (`{value}`, `{min}`, `{max}`, `{values}`) are
/// substituted with the rule's own static parameters at construction time;
/// runtime payload values never enter a message.
#[derive(Debug, Clone)]
pub enum Rule {
    // Resolution-only markers, never checked against a present value
    Required { message: String },
    RequiredIf { field: String, value: Value, message: String },
    Optional,

    Email { message: String },
    MinLength { value: usize, message: String },
    MaxLength { value: usize, message: String },
    Length { min: usize, max: usize, message: String },
    Min { value: f64, message: String },
    Max { value: f64, message: String },
    Between { min: f64, max: f64, message: String },
    Regex { pattern: Regex, message: String },
    Url { message: String },
    Uuid { message: String },
    Enum { values: Vec<Value>, message: String },
    Boolean { message: String },
    Numeric { message: String },
    Date { message: String },
    Timestamp { message: String },
    Json { message: String },
    IsArray { message: String },
    MinItems { value: usize, message: String },
    MaxItems { value: usize, message: String },
    Alpha { message: String },
    AlphaNum { message: String },
    Lowercase { message: String },
    Uppercase { message: String },
    Ip { message: String },
    Phone { message: String },
    AllowedCharacters { characters: String, limit: Option<usize>, message: String },
    Nested { schema: SchemaRef, each: bool, message: String },
}

fn render(template: &str, params: &[(&str, String)]) -> String {
    let mut message = template.to_string();
    for (name, value) in params {
        message = message.replace(&format!("{{{name}}}"), value);
    }
    message
}

fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Rule {
    pub fn required() -> Self {
        Rule::Required { message: REQUIRED_MESSAGE.into() }
    }

    /// Required only when the named sibling field loosely equals `value`.
    pub fn required_if(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Rule::RequiredIf {
            field: field.into(),
            value: value.into(),
            message: REQUIRED_MESSAGE.into(),
        }
    }

    /// Never required; all checks are skipped when the value is absent.
    pub fn optional() -> Self {
        Rule::Optional
    }

    pub fn email() -> Self {
        Rule::Email { message: "Invalid email address.".into() }
    }

    pub fn min_length(value: usize) -> Self {
        Rule::MinLength {
            value,
            message: render("Must be at least {value} characters.", &[("value", value.to_string())]),
        }
    }

    pub fn max_length(value: usize) -> Self {
        Rule::MaxLength {
            value,
            message: render("Must be at most {value} characters.", &[("value", value.to_string())]),
        }
    }

    pub fn length(min: usize, max: usize) -> Self {
        Rule::Length {
            min,
            max,
            message: render(
                "Length must be between {min} and {max}.",
                &[("min", min.to_string()), ("max", max.to_string())],
            ),
        }
    }

    pub fn min(value: f64) -> Self {
        Rule::Min {
            value,
            message: render("Must be at least {value}.", &[("value", value.to_string())]),
        }
    }

    pub fn max(value: f64) -> Self {
        Rule::Max {
            value,
            message: render("Must be at most {value}.", &[("value", value.to_string())]),
        }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Rule::Between {
            min,
            max,
            message: render(
                "Must be between {min} and {max}.",
                &[("min", min.to_string()), ("max", max.to_string())],
            ),
        }
    }

    /// Compile a user pattern. The value must fully match, so the pattern is
    /// anchored here; an invalid pattern is a configuration error surfaced
    /// before any payload is touched.
    pub fn regex(pattern: &str) -> Result<Self> {
        let compiled = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            ConfigurationError::InvalidPattern { pattern: pattern.to_string(), source }
        })?;
        Ok(Rule::Regex { pattern: compiled, message: "Invalid format.".into() })
    }

    pub fn url() -> Self {
        Rule::Url { message: "Invalid URL.".into() }
    }

    pub fn uuid() -> Self {
        Rule::Uuid { message: "Invalid UUID.".into() }
    }

    /// Strict (type-and-value) membership in `values`.
    pub fn one_of(values: Vec<Value>) -> Self {
        let labels = values.iter().map(value_label).collect::<Vec<_>>().join(", ");
        Rule::Enum {
            values,
            message: render("Value must be one of: {values}.", &[("values", labels)]),
        }
    }

    pub fn boolean() -> Self {
        Rule::Boolean { message: "Must be a boolean value.".into() }
    }

    pub fn numeric() -> Self {
        Rule::Numeric { message: "Must be a number.".into() }
    }

    pub fn date() -> Self {
        Rule::Date { message: "Invalid date.".into() }
    }

    pub fn timestamp() -> Self {
        Rule::Timestamp { message: "Invalid timestamp.".into() }
    }

    pub fn json() -> Self {
        Rule::Json { message: "Invalid JSON.".into() }
    }

    pub fn is_array() -> Self {
        Rule::IsArray { message: "Must be an array.".into() }
    }

    pub fn min_items(value: usize) -> Self {
        Rule::MinItems {
            value,
            message: render(
                "Must contain at least {value} items.",
                &[("value", value.to_string())],
            ),
        }
    }

    pub fn max_items(value: usize) -> Self {
        Rule::MaxItems {
            value,
            message: render(
                "Must contain at most {value} items.",
                &[("value", value.to_string())],
            ),
        }
    }

    pub fn alpha() -> Self {
        Rule::Alpha { message: "Must contain only letters.".into() }
    }

    pub fn alpha_num() -> Self {
        Rule::AlphaNum { message: "Must contain only letters and numbers.".into() }
    }

    pub fn lowercase() -> Self {
        Rule::Lowercase { message: "Must be lowercase.".into() }
    }

    pub fn uppercase() -> Self {
        Rule::Uppercase { message: "Must be uppercase.".into() }
    }

    pub fn ip() -> Self {
        Rule::Ip { message: "Invalid IP address.".into() }
    }

    pub fn phone() -> Self {
        Rule::Phone { message: "Invalid phone number.".into() }
    }

    /// Letters plus the characters in `characters`, which may occur at most
    /// `limit` times in total.
    pub fn allowed_characters(
        characters: impl Into<String>,
        limit: impl Into<Option<usize>>,
    ) -> Self {
        Rule::AllowedCharacters {
            characters: characters.into(),
            limit: limit.into(),
            message: "Contains invalid characters.".into(),
        }
    }

    /// Validate the value as a single nested `T` payload.
    pub fn nested<T: Validatable>() -> Self {
        Rule::Nested {
            schema: SchemaRef::of::<T>(),
            each: false,
            message: "Invalid nested payload.".into(),
        }
    }

    /// Validate every element of an array independently against `T`.
    pub fn nested_each<T: Validatable>() -> Self {
        Rule::Nested {
            schema: SchemaRef::of::<T>(),
            each: true,
            message: "Invalid nested payload.".into(),
        }
    }

    /// Replace the message, re-rendering placeholders against the rule's own
    /// static parameters.
    pub fn with_message(self, template: &str) -> Self {
        match self {
            Rule::Required { .. } => Rule::Required { message: template.into() },
            Rule::RequiredIf { field, value, .. } => {
                Rule::RequiredIf { field, value, message: template.into() }
            }
            Rule::Optional => Rule::Optional,
            Rule::Email { .. } => Rule::Email { message: template.into() },
            Rule::MinLength { value, .. } => Rule::MinLength {
                value,
                message: render(template, &[("value", value.to_string())]),
            },
            Rule::MaxLength { value, .. } => Rule::MaxLength {
                value,
                message: render(template, &[("value", value.to_string())]),
            },
            Rule::Length { min, max, .. } => Rule::Length {
                min,
                max,
                message: render(template, &[("min", min.to_string()), ("max", max.to_string())]),
            },
            Rule::Min { value, .. } => Rule::Min {
                value,
                message: render(template, &[("value", value.to_string())]),
            },
            Rule::Max { value, .. } => Rule::Max {
                value,
                message: render(template, &[("value", value.to_string())]),
            },
            Rule::Between { min, max, .. } => Rule::Between {
                min,
                max,
                message: render(template, &[("min", min.to_string()), ("max", max.to_string())]),
            },
            Rule::Regex { pattern, .. } => Rule::Regex { pattern, message: template.into() },
            Rule::Url { .. } => Rule::Url { message: template.into() },
            Rule::Uuid { .. } => Rule::Uuid { message: template.into() },
            Rule::Enum { values, .. } => {
                let labels = values.iter().map(value_label).collect::<Vec<_>>().join(", ");
                Rule::Enum { values, message: render(template, &[("values", labels)]) }
            }
            Rule::Boolean { .. } => Rule::Boolean { message: template.into() },
            Rule::Numeric { .. } => Rule::Numeric { message: template.into() },
            Rule::Date { .. } => Rule::Date { message: template.into() },
            Rule::Timestamp { .. } => Rule::Timestamp { message: template.into() },
            Rule::Json { .. } => Rule::Json { message: template.into() },
            Rule::IsArray { .. } => Rule::IsArray { message: template.into() },
            Rule::MinItems { value, .. } => Rule::MinItems {
                value,
                message: render(template, &[("value", value.to_string())]),
            },
            Rule::MaxItems { value, .. } => Rule::MaxItems {
                value,
                message: render(template, &[("value", value.to_string())]),
            },
            Rule::Alpha { .. } => Rule::Alpha { message: template.into() },
            Rule::AlphaNum { .. } => Rule::AlphaNum { message: template.into() },
            Rule::Lowercase { .. } => Rule::Lowercase { message: template.into() },
            Rule::Uppercase { .. } => Rule::Uppercase { message: template.into() },
            Rule::Ip { .. } => Rule::Ip { message: template.into() },
            Rule::Phone { .. } => Rule::Phone { message: template.into() },
            Rule::AllowedCharacters { characters, limit, .. } => {
                Rule::AllowedCharacters { characters, limit, message: template.into() }
            }
            Rule::Nested { schema, each, .. } => {
                Rule::Nested { schema, each, message: template.into() }
            }
        }
    }

    /// Markers only resolve required status; they are never checked against
    /// a present value.
    pub(crate) fn is_marker(&self) -> bool {
        matches!(self, Rule::Required { .. } | Rule::RequiredIf { .. } | Rule::Optional)
    }
}
