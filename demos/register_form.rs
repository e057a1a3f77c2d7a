//! Validate a registration form payload into a typed DTO.
//!
//! Run with: cargo run --example register_form

use serde::Deserialize;
use verdict::prelude::*;

#[derive(Debug, Validatable, Deserialize)]
#[validatable(message = "Registration failed")]
struct CreateUserDto {
    #[rule(required, email)]
    email: Option<String>,
    #[rule(required, min_length(8))]
    password: Option<String>,
    #[rule(optional, min_length(2, message = "Name must be at least 2 chars"))]
    name: Option<String>,
}

fn validate(label: &str, payload: serde_json::Value) -> Result<(), ConfigurationError> {
    let result = Validator::from_value::<CreateUserDto>(&payload)?;

    if result.is_valid() {
        let dto = result.data().unwrap();
        println!("{label}: accepted {dto:?}");
    } else {
        // The envelope an HTTP layer would return as a 422 body
        println!("{label}: rejected {}", result.error_body());
    }
    Ok(())
}

fn main() -> Result<(), ConfigurationError> {
    validate(
        "good",
        serde_json::json!({
            "email": "dave@example.com",
            "password": "password123",
            "name": "Dave",
        }),
    )?;

    validate(
        "bad",
        serde_json::json!({
            "email": "not-an-email",
            "password": "short",
            "name": "D",
        }),
    )?;

    validate("empty", serde_json::Value::Null)
}
