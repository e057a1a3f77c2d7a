//! verdict - schema-driven payload validation for Rust
//!
//! Declare rules per field, validate untyped JSON-like payloads, and either
//! materialize a typed DTO or get back a field-addressed error map. The
//! engine never performs I/O and values pass through unconverted; rules only
//! check them.
//!
//! # Examples
//!
//! With the default-on `derive` feature:
//!
//! ```
//! use serde::Deserialize;
//! use verdict::prelude::*;
//!
//! #[derive(Validatable, Deserialize)]
//! #[validatable(message = "Registration failed")]
//! struct RegisterDto {
//!     #[rule(required, email)]
//!     email: Option<String>,
//!     #[rule(optional, min_length(8))]
//!     password: Option<String>,
//! }
//!
//! let payload = serde_json::json!({"email": "a@b.com", "password": "longenough"});
//! let result = Validator::from_value::<RegisterDto>(&payload)?;
//! assert!(result.is_valid());
//!
//! let payload = serde_json::json!({"email": "nope", "password": "short"});
//! let result = Validator::from_value::<RegisterDto>(&payload)?;
//! assert!(!result.is_valid());
//! assert_eq!(result.message(), "Registration failed");
//! assert_eq!(
//!     result.errors().messages("email").unwrap(),
//!     &["Invalid email address.".to_string()][..]
//! );
//! # Ok::<(), verdict::ConfigurationError>(())
//! ```
//!
//! Schemas can also be declared by hand through [`Schema::builder`]; the
//! derive expands to exactly that.

// Re-export the engine
pub use verdict_core::*;

// Re-export the derive macro
#[cfg(feature = "derive")]
pub use verdict_derive::Validatable;

// The derive expansion constructs rule parameters through this path
#[doc(hidden)]
pub use serde_json;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ConfigurationError,
        ErrorEntry,
        Errors,
        FieldBuilder,
        Rule,
        Schema,
        Validatable,
        ValidationResult,
        Validator,
    };
}
