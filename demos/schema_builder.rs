//! Declare a schema by hand and validate nested payloads with it.
//!
//! Run with: cargo run --example schema_builder

use serde::Deserialize;
use serde_json::{Value, json};
use verdict::{
    ConfigurationError, FieldBuilder, Rule, Schema, Validatable, Validator,
};

#[derive(Debug, Deserialize)]
struct Address {
    #[allow(dead_code)]
    city: Option<String>,
}

impl Validatable for Address {
    fn schema() -> Result<Schema, ConfigurationError> {
        Schema::builder("Address")
            .field(FieldBuilder::new("city").rule(Rule::required()))
            .build()
    }
}

#[derive(Debug, Deserialize)]
struct Shipment {
    #[allow(dead_code)]
    reference: Option<String>,
    #[allow(dead_code)]
    addresses: Option<Value>,
}

impl Validatable for Shipment {
    fn schema() -> Result<Schema, ConfigurationError> {
        Schema::builder("Shipment")
            .message("Invalid shipment")
            .field(
                FieldBuilder::new("reference")
                    .rule(Rule::required())
                    .rule(Rule::uuid()),
            )
            .field(
                FieldBuilder::new("addresses")
                    .rule(Rule::is_array())
                    .rule(Rule::min_items(1))
                    .rule(Rule::nested_each::<Address>()),
            )
            .build()
    }
}

fn main() -> Result<(), ConfigurationError> {
    let payload = json!({
        "reference": "550e8400-e29b-41d4-a716-446655440000",
        "addresses": [{"city": "Lagos"}, {"city": ""}],
    });

    let result = Validator::from_value::<Shipment>(&payload)?;
    println!("valid: {}", result.is_valid());
    println!("envelope: {}", result.error_body());

    let payload = json!({
        "reference": "550e8400-e29b-41d4-a716-446655440000",
        "addresses": [{"city": "Lagos"}],
    });

    let result = Validator::from_value::<Shipment>(&payload)?;
    println!("valid: {}", result.is_valid());
    println!("shipment: {:?}", result.data());
    Ok(())
}
