// Schema descriptors and the builder that computes field dispositions

use serde_json::{Map, Value};

use crate::errors::{ConfigurationError, Result};
use crate::rules::{REQUIRED_MESSAGE, Rule};
use crate::validators;

/// Whether a field must be present, derived from its marker rules.
#[derive(Debug, Clone)]
pub enum Disposition {
    Required { message: String },
    /// Required only when the named sibling field in the same payload
    /// loosely equals `value`.
    RequiredIf { field: String, value: Value, message: String },
    Optional,
    /// No marker attached: required unless the field declares a default.
    Implicit,
}

/// One named, independently validated slot of a schema.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    rules: Vec<Rule>,
    disposition: Disposition,
    default: Option<Value>,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attached rules in declaration order, markers included.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn disposition(&self) -> &Disposition {
        &self.disposition
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Resolve required status against the current payload. Returns the
    /// required-message when the absent field is in fact required.
    pub(crate) fn required_message(&self, payload: &Map<String, Value>) -> Option<String> {
        match &self.disposition {
            Disposition::Required { message } => Some(message.clone()),
            Disposition::RequiredIf { field, value, message } => {
                let sibling = payload.get(field).unwrap_or(&Value::Null);
                validators::loose_eq(sibling, value).then(|| message.clone())
            }
            Disposition::Optional => None,
            Disposition::Implicit => {
                if self.default.is_some() {
                    None
                } else {
                    Some(REQUIRED_MESSAGE.to_string())
                }
            }
        }
    }
}

/// Ordered field/rule description for one validation target.
///
/// Immutable once built; derive it once per type and reuse it across calls.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    message: String,
    fields: Vec<Field>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            message: None,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema-level message: the configured override or the generic default.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Collects one field's rules and default before the schema is built.
#[derive(Debug)]
pub struct FieldBuilder {
    name: String,
    rules: Vec<Rule>,
    default: Option<Value>,
}

impl FieldBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            default: None,
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Declare a default value. A field with a default behaves as optional
    /// when no marker says otherwise, and the default is materialized when
    /// the payload leaves the field untouched.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    message: Option<String>,
    fields: Vec<FieldBuilder>,
}

impl SchemaBuilder {
    /// Override the schema-level message returned on every result.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<Schema> {
        let mut fields = Vec::with_capacity(self.fields.len());

        for builder in self.fields {
            if fields.iter().any(|field: &Field| field.name == builder.name) {
                return Err(ConfigurationError::DuplicateField(builder.name));
            }

            // First marker in declaration order wins
            let mut disposition = Disposition::Implicit;
            for rule in &builder.rules {
                match rule {
                    Rule::Required { message } => {
                        disposition = Disposition::Required { message: message.clone() };
                        break;
                    }
                    Rule::RequiredIf { field, value, message } => {
                        disposition = Disposition::RequiredIf {
                            field: field.clone(),
                            value: value.clone(),
                            message: message.clone(),
                        };
                        break;
                    }
                    Rule::Optional => {
                        disposition = Disposition::Optional;
                        break;
                    }
                    _ => {}
                }
            }

            fields.push(Field {
                name: builder.name,
                rules: builder.rules,
                disposition,
                default: builder.default,
            });
        }

        let schema = Schema {
            name: self.name,
            message: self
                .message
                .unwrap_or_else(|| crate::rules::DEFAULT_SCHEMA_MESSAGE.to_string()),
            fields,
        };
        log::debug!(
            "built schema `{}` with {} fields",
            schema.name,
            schema.fields.len()
        );
        Ok(schema)
    }
}
