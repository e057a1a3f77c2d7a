//! End-to-end tests for the #[derive(Validatable)] expansion

use serde::Deserialize;
use serde_json::{Value, json};
use verdict::prelude::*;

#[derive(Debug, Validatable, Deserialize)]
#[validatable(message = "Registration failed")]
struct RegisterDto {
    #[rule(required, email)]
    email: Option<String>,
    #[rule(optional, alpha_num, length(3, 20))]
    username: Option<String>,
    #[rule(optional, min_length(8))]
    password: Option<String>,
    #[rule(optional, min_length(2, message = "Name must be at least 2 chars"))]
    name: Option<String>,
    #[rule(default("user"), one_of("user", "admin"))]
    role: Option<String>,
}

#[derive(Debug, Validatable, Deserialize)]
struct AddressDto {
    #[rule(required)]
    city: Option<String>,
    #[rule(optional, alpha)]
    country: Option<String>,
}

#[derive(Debug, Validatable, Deserialize)]
struct ProfileDto {
    #[rule(nested(AddressDto))]
    address: Option<Value>,
    #[rule(optional, is_array, nested_each(AddressDto))]
    addresses: Option<Value>,
}

#[test]
fn test_derive_valid_payload_materializes() {
    let payload = json!({
        "email": "dave@example.com",
        "username": "dave123",
        "password": "password123",
    });

    let result = Validator::from_value::<RegisterDto>(&payload).unwrap();

    assert!(result.is_valid());
    let dto = result.data().unwrap();
    assert_eq!(dto.email.as_deref(), Some("dave@example.com"));
    assert_eq!(dto.username.as_deref(), Some("dave123"));
    // Untouched field keeps its declared default
    assert_eq!(dto.role.as_deref(), Some("user"));
}

#[test]
fn test_derive_collects_errors_and_container_message() {
    let payload = json!({"email": "nope", "password": "short", "name": "D"});

    let result = Validator::from_value::<RegisterDto>(&payload).unwrap();

    assert!(!result.is_valid());
    assert_eq!(result.message(), "Registration failed");
    assert_eq!(
        result.errors().messages("email").unwrap(),
        &["Invalid email address.".to_string()][..]
    );
    assert_eq!(
        result.errors().messages("password").unwrap(),
        &["Must be at least 8 characters.".to_string()][..]
    );
    // Custom per-field template with its placeholder resolved
    assert_eq!(
        result.errors().messages("name").unwrap(),
        &["Name must be at least 2 chars".to_string()][..]
    );
    assert!(result.data().is_none());
}

#[test]
fn test_derive_default_behaves_as_optional_but_still_checked() {
    // Absent: default applies
    let result = Validator::from_value::<RegisterDto>(&json!({"email": "a@b.com"})).unwrap();
    assert!(result.is_valid());
    assert_eq!(result.data().unwrap().role.as_deref(), Some("user"));

    // Present but outside the enum: strict membership fails
    let result =
        Validator::from_value::<RegisterDto>(&json!({"email": "a@b.com", "role": "root"}))
            .unwrap();
    assert!(!result.is_valid());
    assert_eq!(
        result.errors().messages("role").unwrap(),
        &["Value must be one of: user, admin.".to_string()][..]
    );
}

#[test]
fn test_derive_matches_hand_written_builder() {
    #[derive(Debug, Deserialize)]
    struct ManualDto {
        #[allow(dead_code)]
        email: Option<String>,
    }

    impl Validatable for ManualDto {
        fn schema() -> Result<Schema, ConfigurationError> {
            Schema::builder("ManualDto")
                .field(FieldBuilder::new("email").rule(Rule::required()).rule(Rule::email()))
                .build()
        }
    }

    #[derive(Debug, Validatable, Deserialize)]
    struct DerivedDto {
        #[rule(required, email)]
        #[allow(dead_code)]
        email: Option<String>,
    }

    for payload in [json!({}), json!({"email": "bad"}), json!({"email": "a@b.com"})] {
        let manual = Validator::from_value::<ManualDto>(&payload).unwrap();
        let derived = Validator::from_value::<DerivedDto>(&payload).unwrap();
        assert_eq!(manual.is_valid(), derived.is_valid(), "payload: {payload}");
        assert_eq!(manual.errors().to_json(), derived.errors().to_json());
    }
}

#[test]
fn test_derive_nested_object_and_each() {
    let payload = json!({
        "address": {"city": "Lagos", "country": "Nigeria"},
        "addresses": [{"city": "Lagos"}, {"city": ""}],
    });

    let result = Validator::from_value::<ProfileDto>(&payload).unwrap();

    assert!(!result.is_valid());
    let items = result.errors().get("addresses").unwrap().as_items().unwrap();
    assert!(!items.contains_key(&0));
    assert_eq!(
        items.get(&1).unwrap().messages("city").unwrap(),
        &["This field is required.".to_string()][..]
    );

    let payload = json!({
        "address": {"city": "Lagos"},
        "addresses": [{"city": "Abuja"}],
    });
    let result = Validator::from_value::<ProfileDto>(&payload).unwrap();
    assert!(result.is_valid());
}

#[test]
fn test_derive_required_if() {
    #[derive(Debug, Validatable, Deserialize)]
    struct EscalationDto {
        #[rule(required)]
        #[allow(dead_code)]
        name: Option<String>,
        #[rule(required_if("role", "admin"))]
        #[allow(dead_code)]
        token: Option<String>,
    }

    let result =
        Validator::from_value::<EscalationDto>(&json!({"name": "Dave", "role": "admin"})).unwrap();
    assert!(!result.is_valid());
    assert_eq!(
        result.errors().messages("token").unwrap(),
        &["This field is required.".to_string()][..]
    );

    let result =
        Validator::from_value::<EscalationDto>(&json!({"name": "Dave", "role": "user"})).unwrap();
    assert!(result.is_valid());
}

#[test]
fn test_derive_regex_and_allowed_characters() {
    #[derive(Debug, Validatable, Deserialize)]
    struct HandleDto {
        #[rule(optional, regex("[a-z]{2}-[0-9]{4}"))]
        #[allow(dead_code)]
        code: Option<String>,
        #[rule(optional, allowed_characters("_", 2))]
        #[allow(dead_code)]
        handle: Option<String>,
    }

    let result = Validator::from_value::<HandleDto>(&json!({"code": "ab-1234"})).unwrap();
    assert!(result.is_valid());

    let result = Validator::from_value::<HandleDto>(&json!({"code": "ab-12345"})).unwrap();
    assert_eq!(
        result.errors().messages("code").unwrap(),
        &["Invalid format.".to_string()][..]
    );

    let result = Validator::from_value::<HandleDto>(&json!({"handle": "a_b_c_d"})).unwrap();
    assert_eq!(
        result.errors().messages("handle").unwrap(),
        &["Contains invalid characters.".to_string()][..]
    );
}

#[test]
fn test_derive_error_envelope() {
    let result = Validator::from_value::<RegisterDto>(&Value::Null).unwrap();

    assert_eq!(
        result.error_body(),
        json!({
            "message": "Registration failed",
            "errors": {"email": ["This field is required."]},
        })
    );
}
