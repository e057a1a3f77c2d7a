//! Schema-driven payload validation for verdict
//!
//! Validates untyped key/value payloads against declared schemas and, on
//! total validity, materializes a typed instance; on failure it returns
//! structured, field-addressed error messages. The engine is pure and
//! synchronous: no I/O, no shared state beyond the read-only per-type
//! schema cache.
//!
//! # Examples
//!
//! ```
//! use serde::Deserialize;
//! use verdict_core::{ConfigurationError, FieldBuilder, Rule, Schema, Validatable, Validator};
//!
//! #[derive(Deserialize)]
//! struct SignIn {
//!     email: String,
//!     password: String,
//! }
//!
//! impl Validatable for SignIn {
//!     fn schema() -> Result<Schema, ConfigurationError> {
//!         Schema::builder("SignIn")
//!             .field(FieldBuilder::new("email").rule(Rule::required()).rule(Rule::email()))
//!             .field(FieldBuilder::new("password").rule(Rule::min_length(8)))
//!             .build()
//!     }
//! }
//!
//! let payload = serde_json::json!({"email": "a@b.com", "password": "longenough"});
//! let result = Validator::from_value::<SignIn>(&payload)?;
//! assert!(result.is_valid());
//! assert_eq!(result.data().unwrap().email, "a@b.com");
//!
//! let payload = serde_json::json!({"email": "not-an-email", "password": "short"});
//! let result = Validator::from_value::<SignIn>(&payload)?;
//! assert!(!result.is_valid());
//! assert!(result.errors().messages("email").is_some());
//! assert!(result.data().is_none());
//! # Ok::<(), ConfigurationError>(())
//! ```

mod engine;
mod errors;
mod result;
mod rules;
mod schema;
mod traits;
mod validators;

pub use engine::{MAX_NESTING_DEPTH, Validator};
pub use errors::{ConfigurationError, ErrorEntry, Errors, Result};
pub use result::{Evaluation, ValidationResult};
pub use rules::{Rule, SchemaRef};
pub use schema::{Disposition, Field, FieldBuilder, Schema, SchemaBuilder};
pub use traits::{Validatable, schema_of};
