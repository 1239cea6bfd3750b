//! Declarative field rules and the generic validator that evaluates them.
//!
//! Each entity declares one [`RuleSet`]. Validation collects every violation
//! (the first failing check per field) in declaration order rather than
//! stopping at the first problem.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::document::Document;
use super::error::ValidationError;

/// Characters allowed in phone numbers.
pub static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9\-+() ]+$").expect("phone pattern is a valid regex")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is a valid regex")
});

/// JSON type accepted for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    StringOrNumber,
}

/// Named string format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Email,
}

impl Format {
    fn accepts(self, value: &str) -> bool {
        match self {
            Self::Email => EMAIL_PATTERN.is_match(value),
        }
    }
}

/// Rules for one payload field.
///
/// # Examples
/// ```
/// use workforce::domain::validation::FieldRule;
///
/// let rule = FieldRule::string("name")
///     .required()
///     .length(2, 50)
///     .messages("Name is required", "Name cannot be empty");
/// assert_eq!(rule.field(), "name");
/// ```
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: &'static str,
    kind: FieldType,
    required: bool,
    min_len: Option<usize>,
    max_len: Option<usize>,
    pattern: Option<&'static Regex>,
    format: Option<Format>,
    required_message: Option<&'static str>,
    empty_message: Option<&'static str>,
}

impl FieldRule {
    fn new(field: &'static str, kind: FieldType) -> Self {
        Self {
            field,
            kind,
            required: false,
            min_len: None,
            max_len: None,
            pattern: None,
            format: None,
            required_message: None,
            empty_message: None,
        }
    }

    /// A string field.
    pub fn string(field: &'static str) -> Self {
        Self::new(field, FieldType::String)
    }

    /// A field accepting a string or a number.
    pub fn string_or_number(field: &'static str) -> Self {
        Self::new(field, FieldType::StringOrNumber)
    }

    /// Require the field to be present.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Bound the string length in characters, inclusive.
    #[must_use]
    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_len = Some(min);
        self.max_len = Some(max);
        self
    }

    /// Require string values to match `pattern`.
    #[must_use]
    pub fn pattern(mut self, pattern: &'static Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Require string values to be email addresses.
    #[must_use]
    pub fn email(mut self) -> Self {
        self.format = Some(Format::Email);
        self
    }

    /// Custom messages for a missing field and an empty string.
    #[must_use]
    pub fn messages(mut self, required: &'static str, empty: &'static str) -> Self {
        self.required_message = Some(required);
        self.empty_message = Some(empty);
        self
    }

    /// Custom message for a missing field.
    #[must_use]
    pub fn required_message(mut self, required: &'static str) -> Self {
        self.required_message = Some(required);
        self
    }

    /// Field name the rule applies to.
    pub fn field(&self) -> &'static str {
        self.field
    }

    fn missing(&self) -> Option<String> {
        if !self.required {
            return None;
        }
        Some(
            self.required_message
                .map_or_else(|| format!("\"{}\" is required", self.field), str::to_owned),
        )
    }

    fn check(&self, value: &Value) -> Option<String> {
        let field = self.field;
        let text = match (self.kind, value) {
            (_, Value::String(text)) => text,
            (FieldType::StringOrNumber, Value::Number(_)) => return None,
            (FieldType::String, _) => return Some(format!("\"{field}\" must be a string")),
            (FieldType::StringOrNumber, _) => {
                return Some(format!("\"{field}\" must be a string or a number"));
            }
        };

        if text.is_empty() {
            return Some(self.empty_message.map_or_else(
                || format!("\"{field}\" is not allowed to be empty"),
                str::to_owned,
            ));
        }
        let chars = text.chars().count();
        if let Some(min) = self.min_len.filter(|min| chars < *min) {
            return Some(format!(
                "\"{field}\" length must be at least {min} characters long"
            ));
        }
        if let Some(max) = self.max_len.filter(|max| chars > *max) {
            return Some(format!(
                "\"{field}\" length must be less than or equal to {max} characters long"
            ));
        }
        if let Some(pattern) = self.pattern.filter(|pattern| !pattern.is_match(text)) {
            return Some(format!(
                "\"{field}\" with value \"{text}\" fails to match the required pattern: /{}/",
                pattern.as_str()
            ));
        }
        if self.format.is_some_and(|format| !format.accepts(text)) {
            return Some(format!("\"{field}\" must be a valid email"));
        }
        None
    }

    fn violation(&self, payload: &Document) -> Option<String> {
        match payload.get(self.field) {
            None => self.missing(),
            Some(value) => self.check(value),
        }
    }
}

/// Ordered field rules for one payload shape.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    /// Declare the rules in evaluation order.
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// The same rules with every field optional, for partial updates.
    #[must_use]
    pub fn partial(&self) -> Self {
        Self {
            rules: self
                .rules
                .iter()
                .cloned()
                .map(|mut rule| {
                    rule.required = false;
                    rule
                })
                .collect(),
        }
    }
}

/// Payload types bound to a rule set.
pub trait Validate {
    /// Rules the inbound payload must satisfy.
    fn rules() -> &'static RuleSet;
}

/// Evaluate `payload` against `rules`, reporting every violation at once.
///
/// Fields the rules do not mention are ignored.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use workforce::domain::validation::{validate, FieldRule, RuleSet};
///
/// let rules = RuleSet::new(vec![
///     FieldRule::string("name").required().messages("Name is required", "Name cannot be empty"),
///     FieldRule::string("email").required().email(),
/// ]);
/// let payload = json!({}).as_object().cloned().unwrap_or_default();
/// let err = validate(&rules, &payload).expect_err("two fields missing");
/// assert_eq!(
///     err.to_string(),
///     "Validation error: Name is required, \"email\" is required"
/// );
/// ```
pub fn validate(rules: &RuleSet, payload: &Document) -> Result<(), ValidationError> {
    let violations = rules
        .rules
        .iter()
        .filter_map(|rule| rule.violation(payload))
        .collect();
    match ValidationError::from_violations(violations) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
