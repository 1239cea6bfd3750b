//! Tests for the declarative validator.

use super::*;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn payload(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("payload fixture must be an object"),
    }
}

#[fixture]
fn contact_rules() -> RuleSet {
    RuleSet::new(vec![
        FieldRule::string("name")
            .required()
            .length(2, 50)
            .messages("Name is required", "Name cannot be empty"),
        FieldRule::string("email").required().email(),
        FieldRule::string("phone").required().pattern(&PHONE_PATTERN),
        FieldRule::string_or_number("branchId")
            .required()
            .required_message("Branch ID is required"),
    ])
}

#[rstest]
fn accepts_a_complete_payload(contact_rules: RuleSet) {
    let body = payload(json!({
        "name": "Ada",
        "email": "ada@example.com",
        "phone": "+44 (0) 20-7946",
        "branchId": 7,
    }));
    assert!(validate(&contact_rules, &body).is_ok());
}

#[rstest]
fn reports_every_missing_field_in_declaration_order(contact_rules: RuleSet) {
    let err = validate(&contact_rules, &Document::new()).expect_err("all fields missing");
    assert_eq!(
        err.violations(),
        [
            "Name is required",
            "\"email\" is required",
            "\"phone\" is required",
            "Branch ID is required",
        ]
    );
}

#[rstest]
#[case(json!(""), "Name cannot be empty")]
#[case(json!("A"), "\"name\" length must be at least 2 characters long")]
#[case(json!("x".repeat(51)), "\"name\" length must be less than or equal to 50 characters long")]
#[case(json!(42), "\"name\" must be a string")]
fn reports_first_failing_check_for_name(
    contact_rules: RuleSet,
    #[case] name: Value,
    #[case] expected: &str,
) {
    let body = payload(json!({
        "name": name,
        "email": "ada@example.com",
        "phone": "123",
        "branchId": "b1",
    }));
    let err = validate(&contact_rules, &body).expect_err("name is invalid");
    assert_eq!(err.violations(), [expected]);
}

#[rstest]
fn length_counts_characters_not_bytes(contact_rules: RuleSet) {
    let body = payload(json!({
        "name": "Zoë",
        "email": "zoe@example.com",
        "phone": "123",
        "branchId": "b1",
    }));
    assert!(validate(&contact_rules, &body).is_ok());
}

#[rstest]
fn pattern_violation_quotes_value_and_pattern(contact_rules: RuleSet) {
    let body = payload(json!({
        "name": "Ada",
        "email": "ada@example.com",
        "phone": "call me",
        "branchId": "b1",
    }));
    let err = validate(&contact_rules, &body).expect_err("phone is invalid");
    assert_eq!(
        err.violations(),
        [r#""phone" with value "call me" fails to match the required pattern: /^[0-9\-+() ]+$/"#]
    );
}

#[rstest]
#[case("not-an-email")]
#[case("ada@")]
#[case("ada@example")]
#[case("a da@example.com")]
fn rejects_malformed_email(contact_rules: RuleSet, #[case] email: &str) {
    let body = payload(json!({
        "name": "Ada",
        "email": email,
        "phone": "123",
        "branchId": "b1",
    }));
    let err = validate(&contact_rules, &body).expect_err("email is invalid");
    assert_eq!(err.violations(), ["\"email\" must be a valid email"]);
}

#[rstest]
#[case(json!(true))]
#[case(json!(null))]
#[case(json!(["b1"]))]
fn string_or_number_rejects_other_types(contact_rules: RuleSet, #[case] branch: Value) {
    let body = payload(json!({
        "name": "Ada",
        "email": "ada@example.com",
        "phone": "123",
        "branchId": branch,
    }));
    let err = validate(&contact_rules, &body).expect_err("branchId is invalid");
    assert_eq!(
        err.violations(),
        ["\"branchId\" must be a string or a number"]
    );
}

#[rstest]
fn partial_rules_skip_missing_fields_but_check_supplied_ones(contact_rules: RuleSet) {
    let partial = contact_rules.partial();
    assert!(validate(&partial, &Document::new()).is_ok());

    let err = validate(&partial, &payload(json!({"phone": "abc"}))).expect_err("bad phone");
    assert_eq!(err.violations().len(), 1);
    assert!(err.violations()[0].starts_with("\"phone\" with value \"abc\""));
}

#[rstest]
fn unknown_fields_are_ignored(contact_rules: RuleSet) {
    let body = payload(json!({
        "name": "Ada",
        "email": "ada@example.com",
        "phone": "123",
        "branchId": "b1",
        "nickname": 3,
    }));
    assert!(validate(&contact_rules, &body).is_ok());
}
