//! Document primitives shared by the repository and store adapters.
//!
//! A document is a JSON object addressed by collection name and identifier.
//! The store tracks a monotonically increasing revision per document so
//! transactions can detect concurrent writes.

use std::fmt;

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Length of store-assigned identifiers.
pub const GENERATED_ID_LEN: usize = 20;

/// Field data held by a document.
pub type Document = Map<String, Value>;

/// Validation errors for [`DocumentId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentIdValidationError {
    #[error("document id must not be empty")]
    Empty,
    #[error("document id must not contain '/'")]
    ContainsSlash,
}

/// Identifier of a document within its collection.
///
/// ## Invariants
/// - Non-empty once trimmed.
/// - Contains no `/` (path separator in document addresses).
///
/// # Examples
/// ```
/// use workforce::domain::DocumentId;
///
/// let id = DocumentId::new("b1").expect("valid id");
/// assert_eq!(id.as_str(), "b1");
/// assert!(DocumentId::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Validate and wrap an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, DocumentIdValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DocumentIdValidationError::Empty);
        }
        if id.contains('/') {
            return Err(DocumentIdValidationError::ContainsSlash);
        }
        Ok(Self(id))
    }

    /// A fresh random identifier of [`GENERATED_ID_LEN`] alphanumeric
    /// characters.
    pub fn generate() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(GENERATED_ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DocumentIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

/// A document as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub data: Document,
    pub revision: u64,
}

impl StoredDocument {
    /// Field data with the document id merged in under `"id"`.
    ///
    /// A stored `"id"` field never overrides the store-assigned identifier.
    pub fn into_entity_value(self) -> Value {
        let mut data = self.data;
        data.insert("id".to_owned(), Value::String(self.id.into()));
        Value::Object(data)
    }
}

/// Scalar value accepted in an equality filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(Number),
    Null,
}

impl FilterValue {
    /// JSON representation compared against stored fields.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(number) => Value::Number(number.clone()),
            Self::Null => Value::Null,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// Equality predicate on a top-level document field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: FilterValue,
}

impl FieldFilter {
    /// Match documents whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether the document data satisfies this filter.
    ///
    /// Numbers compare by value, so `7` matches a stored `7.0`.
    pub fn matches(&self, data: &Document) -> bool {
        data.get(&self.field).is_some_and(|stored| match (stored, &self.value) {
            (Value::Number(stored), FilterValue::Number(wanted)) => {
                numbers_equal(stored, wanted)
            }
            (stored, wanted) => *stored == wanted.to_json(),
        })
    }
}

/// Value equality across integer and float representations.
pub(crate) fn numbers_equal(left: &Number, right: &Number) -> bool {
    left == right
        || left
            .as_f64()
            .zip(right.as_f64())
            .is_some_and(|(left, right)| left == right)
}

/// Whether the document data satisfies every filter (logical AND).
pub fn matches_all(filters: &[FieldFilter], data: &Document) -> bool {
    filters.iter().all(|filter| filter.matches(data))
}
