//! Domain-level error taxonomy.
//!
//! These errors are transport agnostic. They carry an HTTP-equivalent status
//! so the inbound adapter can translate them without inspecting their origin,
//! but nothing here depends on Actix.
//!
//! - [`RepositoryError`]: raised at the document repository boundary.
//! - [`ServiceError`]: raised by entity services.
//! - [`ValidationError`]: aggregated field-rule violations.
//! - [`Error`]: the single type bubbled up to the outermost handler.

use std::fmt;

/// Code attached to a missing document.
pub const DOC_NOT_FOUND: &str = "DOC_NOT_FOUND";
/// Code attached to a failed transaction.
pub const TRANSACTION_FAILED: &str = "TRANSACTION_FAILED";
/// Code attached to stored documents that do not match their entity shape.
pub const INVALID_DOCUMENT: &str = "INVALID_DOCUMENT";
/// Code reported for validation failures reaching the outermost handler.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// Code reported for errors outside the taxonomy.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Status used when no better mapping is known.
pub const INTERNAL_STATUS: u16 = 500;
const NOT_FOUND_STATUS: u16 = 404;

/// Failure raised at the document repository boundary.
///
/// No backend-specific error crosses the repository; every failure is
/// normalised into this shape.
///
/// # Examples
/// ```
/// use workforce::domain::RepositoryError;
///
/// let err = RepositoryError::not_found("branches", "b1");
/// assert_eq!(err.code(), "DOC_NOT_FOUND");
/// assert_eq!(err.http_status(), 404);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RepositoryError {
    message: String,
    code: String,
    http_status: u16,
}

impl RepositoryError {
    /// Build an error from its parts.
    pub fn new(message: impl Into<String>, code: impl Into<String>, http_status: u16) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            http_status,
        }
    }

    /// A document lookup that found nothing.
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::new(
            format!("Document not found in {collection} with id {id}"),
            DOC_NOT_FOUND,
            NOT_FOUND_STATUS,
        )
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Machine-readable code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// HTTP-equivalent status.
    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Whether this error reports a missing entity.
    pub fn is_not_found(&self) -> bool {
        self.code.ends_with("NOT_FOUND")
    }
}

/// Failure raised by entity services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    message: String,
    code: String,
    http_status: u16,
}

impl ServiceError {
    /// Build an error from its parts.
    pub fn new(message: impl Into<String>, code: impl Into<String>, http_status: u16) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            http_status,
        }
    }

    /// A stored document that does not decode into its entity type.
    pub fn invalid_document(collection: &str, id: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            format!("Document {id} in {collection} is malformed: {reason}"),
            INVALID_DOCUMENT,
            INTERNAL_STATUS,
        )
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Machine-readable code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// HTTP-equivalent status.
    pub fn http_status(&self) -> u16 {
        self.http_status
    }
}

/// Aggregated field-rule violations.
///
/// ## Invariants
/// - Holds at least one violation message, in rule declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<String>,
}

impl ValidationError {
    /// Wrap the collected violations; `None` when there are none.
    pub fn from_violations(violations: Vec<String>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    /// A single violation.
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            violations: vec![message.into()],
        }
    }

    /// Individual violation messages.
    pub fn violations(&self) -> &[String] {
        &self.violations
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error: {}", self.violations.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Error bubbled from services to the outermost handler.
///
/// # Examples
/// ```
/// use workforce::domain::{Error, RepositoryError};
///
/// let err: Error = RepositoryError::not_found("employees", "e1").into();
/// assert_eq!(err.http_status(), 404);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Repository failure, including not-found.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// Service failure.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// Payload failed its field rules.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Anything outside the taxonomy. The message is absent when the failure
    /// carried no detail at all.
    #[error("{}", .0.as_deref().unwrap_or("unexpected error"))]
    Unexpected(Option<String>),
}

impl Error {
    /// Unexpected failure with a diagnostic message.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(Some(message.into()))
    }

    /// HTTP-equivalent status for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Repository(err) => err.http_status(),
            Self::Service(err) => err.http_status(),
            Self::Validation(_) => 400,
            Self::Unexpected(_) => INTERNAL_STATUS,
        }
    }

    /// Machine-readable code for this error.
    pub fn code(&self) -> &str {
        match self {
            Self::Repository(err) => err.code(),
            Self::Service(err) => err.code(),
            Self::Validation(_) => VALIDATION_ERROR,
            Self::Unexpected(_) => UNKNOWN_ERROR,
        }
    }
}
