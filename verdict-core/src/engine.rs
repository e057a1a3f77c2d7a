// Validation engine: per-field evaluation, nested recursion, materialization

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::errors::{ConfigurationError, ErrorEntry, Errors, Result};
use crate::result::{Evaluation, ValidationResult};
use crate::rules::{Rule, SchemaRef};
use crate::schema::Schema;
use crate::traits::{Validatable, schema_of};
use crate::validators;

/// Recursion bound for nested schemas. A cyclic schema graph hits this limit
/// instead of overflowing the stack.
pub const MAX_NESTING_DEPTH: usize = 32;

/// The validation engine.
///
/// A pure, synchronous computation: each call operates solely on its payload
/// and an already-derived schema and produces an independent result.
pub struct Validator;

impl Validator {
    /// Validate a decoded JSON value against `T`'s schema.
    ///
    /// `Null` counts as an entirely absent payload (every required field
    /// fails); any other non-object value is a configuration error.
    pub fn from_value<T: Validatable>(payload: &Value) -> Result<ValidationResult<T>> {
        match payload {
            Value::Null => Self::from_map::<T>(&Map::new()),
            Value::Object(map) => Self::from_map::<T>(map),
            _ => Err(ConfigurationError::PayloadNotObject),
        }
    }

    /// Validate a payload mapping against `T`'s schema and materialize the
    /// instance on total validity.
    pub fn from_map<T: Validatable>(payload: &Map<String, Value>) -> Result<ValidationResult<T>> {
        let schema = schema_of::<T>()?;
        let evaluation = Self::evaluate(&schema, payload)?;
        let message = schema.message().to_string();

        if evaluation.is_valid() {
            let record = Value::Object(evaluation.into_record());
            let data: T = serde_json::from_value(record)
                .map_err(|e| ConfigurationError::Materialize(e.to_string()))?;
            Ok(ValidationResult::valid(message, data))
        } else {
            Ok(ValidationResult::invalid(message, evaluation.into_errors()))
        }
    }

    /// Untyped core: evaluate a payload against an already-derived schema.
    pub fn evaluate(schema: &Schema, payload: &Map<String, Value>) -> Result<Evaluation> {
        Self::evaluate_at(schema, payload, 0)
    }

    fn evaluate_at(schema: &Schema, payload: &Map<String, Value>, depth: usize) -> Result<Evaluation> {
        log::trace!("validating payload against schema `{}`", schema.name());

        let mut errors = Errors::new();
        let mut record = Map::new();

        for field in schema.fields() {
            let value = payload.get(field.name()).unwrap_or(&Value::Null);

            if validators::is_empty(value) {
                match field.required_message(payload) {
                    // The resolved required-message is the field's sole error
                    Some(message) => {
                        errors.insert(field.name(), ErrorEntry::Messages(vec![message]));
                    }
                    // Not required: skip entirely, keeping the declared default
                    None => {
                        if let Some(default) = field.default_value() {
                            record.insert(field.name().to_string(), default.clone());
                        }
                    }
                }
                continue;
            }

            let mut messages = Vec::new();
            let mut nested_failure = None;

            for rule in field.rules() {
                if rule.is_marker() {
                    continue;
                }
                if let Rule::Nested { schema: target, each, message } = rule {
                    if let Some(entry) = Self::check_nested(target, *each, value, message, depth)? {
                        nested_failure = Some(entry);
                    }
                    continue;
                }
                if let Some(message) = Self::rule_failure(rule, value) {
                    messages.push(message.to_string());
                }
            }

            // A failing Nested rule replaces the field's entry; plain rule
            // failures accumulate
            if let Some(entry) = nested_failure {
                errors.insert(field.name(), entry);
            } else if !messages.is_empty() {
                errors.insert(field.name(), ErrorEntry::Messages(messages));
            } else {
                record.insert(field.name().to_string(), value.clone());
            }
        }

        Ok(Evaluation::new(errors, record))
    }

    /// Exhaustive per-variant evaluator. Returns the rule's message when the
    /// present value fails its check.
    fn rule_failure<'r>(rule: &'r Rule, value: &Value) -> Option<&'r str> {
        let (passed, message) = match rule {
            // Markers and Nested are handled by the field loop
            Rule::Required { .. } | Rule::RequiredIf { .. } | Rule::Optional | Rule::Nested { .. } => {
                return None;
            }

            Rule::Email { message } => (validators::is_email(value), message),
            Rule::MinLength { value: min, message } => {
                (validators::string_length(value).is_some_and(|n| n >= *min), message)
            }
            Rule::MaxLength { value: max, message } => {
                (validators::string_length(value).is_some_and(|n| n <= *max), message)
            }
            Rule::Length { min, max, message } => (
                validators::string_length(value).is_some_and(|n| n >= *min && n <= *max),
                message,
            ),
            Rule::Min { value: min, message } => {
                (validators::as_number(value).is_some_and(|n| n >= *min), message)
            }
            Rule::Max { value: max, message } => {
                (validators::as_number(value).is_some_and(|n| n <= *max), message)
            }
            Rule::Between { min, max, message } => (
                validators::as_number(value).is_some_and(|n| n >= *min && n <= *max),
                message,
            ),
            Rule::Regex { pattern, message } => {
                (value.as_str().is_some_and(|s| pattern.is_match(s)), message)
            }
            Rule::Url { message } => (validators::is_url(value), message),
            Rule::Uuid { message } => (validators::is_uuid(value), message),
            Rule::Enum { values, message } => (values.iter().any(|v| v == value), message),
            Rule::Boolean { message } => (validators::as_boolean_like(value).is_some(), message),
            Rule::Numeric { message } => (validators::as_number(value).is_some(), message),
            Rule::Date { message } => (validators::is_date(value), message),
            Rule::Timestamp { message } => (validators::is_timestamp(value), message),
            Rule::Json { message } => (validators::is_json(value), message),
            Rule::IsArray { message } => (value.is_array(), message),
            Rule::MinItems { value: min, message } => {
                (value.as_array().is_some_and(|a| a.len() >= *min), message)
            }
            Rule::MaxItems { value: max, message } => {
                (value.as_array().is_some_and(|a| a.len() <= *max), message)
            }
            Rule::Alpha { message } => (validators::is_alpha(value), message),
            Rule::AlphaNum { message } => (validators::is_alpha_num(value), message),
            Rule::Lowercase { message } => (validators::is_lowercase(value), message),
            Rule::Uppercase { message } => (validators::is_uppercase(value), message),
            Rule::Ip { message } => (validators::is_ip(value), message),
            Rule::Phone { message } => (validators::is_phone(value), message),
            Rule::AllowedCharacters { characters, limit, message } => (
                validators::allowed_characters(value, characters, *limit),
                message,
            ),
        };

        (!passed).then_some(message.as_str())
    }

    fn check_nested(
        target: &SchemaRef,
        each: bool,
        value: &Value,
        message: &str,
        depth: usize,
    ) -> Result<Option<ErrorEntry>> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(ConfigurationError::NestingTooDeep(MAX_NESTING_DEPTH));
        }

        if each {
            let Some(items) = value.as_array() else {
                return Ok(Some(ErrorEntry::Messages(vec![message.to_string()])));
            };

            let schema = target.resolve()?;
            let mut failures = BTreeMap::new();
            for (index, item) in items.iter().enumerate() {
                match item.as_object() {
                    Some(object) => {
                        let evaluation = Self::evaluate_at(&schema, object, depth + 1)?;
                        if !evaluation.is_valid() {
                            failures.insert(index, evaluation.into_errors());
                        }
                    }
                    None => {
                        let mut synthetic = Errors::new();
                        synthetic.insert("message", ErrorEntry::Messages(vec![message.to_string()]));
                        failures.insert(index, synthetic);
                    }
                }
            }

            // An empty or all-valid array is a pass
            Ok((!failures.is_empty()).then_some(ErrorEntry::Items(failures)))
        } else {
            let Some(object) = value.as_object() else {
                return Ok(Some(ErrorEntry::Messages(vec![message.to_string()])));
            };

            let schema = target.resolve()?;
            let evaluation = Self::evaluate_at(&schema, object, depth + 1)?;
            Ok((!evaluation.is_valid()).then(|| ErrorEntry::Nested(evaluation.into_errors())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldBuilder;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    #[test]
    fn test_errors_accumulate_across_rules_on_one_field() {
        let schema = Schema::builder("Multi")
            .field(
                FieldBuilder::new("code")
                    .rule(Rule::alpha())
                    .rule(Rule::min_length(5))
                    .rule(Rule::uppercase()),
            )
            .build()
            .unwrap();

        let evaluation =
            Validator::evaluate(&schema, &payload(json!({"code": "ab1"}))).unwrap();
        let messages = evaluation.errors().messages("code").unwrap();
        assert_eq!(
            messages,
            &[
                "Must contain only letters.".to_string(),
                "Must be at least 5 characters.".to_string(),
                "Must be uppercase.".to_string(),
            ][..]
        );
    }

    #[test]
    fn test_marker_rules_never_checked_against_present_values() {
        let schema = Schema::builder("Markers")
            .field(FieldBuilder::new("name").rule(Rule::required()))
            .build()
            .unwrap();

        let evaluation =
            Validator::evaluate(&schema, &payload(json!({"name": "Dave"}))).unwrap();
        assert!(evaluation.is_valid());
        assert_eq!(evaluation.record().get("name"), Some(&json!("Dave")));
    }

    #[test]
    fn test_unknown_payload_keys_ignored() {
        let schema = Schema::builder("Narrow")
            .field(FieldBuilder::new("name").rule(Rule::required()))
            .build()
            .unwrap();

        let evaluation = Validator::evaluate(
            &schema,
            &payload(json!({"name": "Dave", "extra": "ignored"})),
        )
        .unwrap();
        assert!(evaluation.is_valid());
        assert!(!evaluation.record().contains_key("extra"));
    }

    #[test]
    fn test_empty_string_is_treated_as_absent() {
        let schema = Schema::builder("Blank")
            .field(FieldBuilder::new("name").rule(Rule::required()).rule(Rule::min_length(3)))
            .build()
            .unwrap();

        let evaluation =
            Validator::evaluate(&schema, &payload(json!({"name": "   "}))).unwrap();
        // Only the required message; min_length never ran
        assert_eq!(
            evaluation.errors().messages("name").unwrap(),
            &["This field is required.".to_string()][..]
        );
    }

    #[test]
    fn test_default_recorded_for_untouched_field() {
        let schema = Schema::builder("Defaults")
            .field(FieldBuilder::new("role").default_value(json!("user")))
            .build()
            .unwrap();

        let evaluation = Validator::evaluate(&schema, &Map::new()).unwrap();
        assert!(evaluation.is_valid());
        assert_eq!(evaluation.record().get("role"), Some(&json!("user")));
    }
}
