//! Port for the document store backing every collection.
//!
//! Adapters speak in terms of collections, document identifiers and JSON
//! objects. They report failures as [`StoreError`]; the repository boundary
//! normalises those into [`crate::domain::RepositoryError`].

use async_trait::async_trait;

use crate::domain::{Document, DocumentId, FieldFilter, StoredDocument};

use super::define_port_error;

define_port_error! {
    /// Errors raised by document store adapters, modelled on the canonical
    /// status codes of hosted document databases.
    pub enum StoreError {
        /// The addressed document does not exist.
        NotFound { message: String } =>
            "document store: not found: {message}" ; "NOT_FOUND", Some(404),
        /// A create collided with an existing document.
        AlreadyExists { message: String } =>
            "document store: already exists: {message}" ; "ALREADY_EXISTS", Some(409),
        /// The caller may not perform the operation.
        PermissionDenied { message: String } =>
            "document store: permission denied: {message}" ; "PERMISSION_DENIED", Some(403),
        /// The request was malformed for the store.
        InvalidArgument { message: String } =>
            "document store: invalid argument: {message}" ; "INVALID_ARGUMENT", Some(400),
        /// A transaction conflicted with a concurrent write.
        Aborted { message: String } =>
            "document store: aborted: {message}" ; "ABORTED", Some(409),
        /// A write precondition did not hold.
        FailedPrecondition { message: String } =>
            "document store: failed precondition: {message}" ; "FAILED_PRECONDITION", Some(412),
        /// The store could not be reached.
        Unavailable { message: String } =>
            "document store: unavailable: {message}" ; "UNAVAILABLE", Some(503),
        /// The store did not answer in time.
        DeadlineExceeded { message: String } =>
            "document store: deadline exceeded: {message}" ; "DEADLINE_EXCEEDED", Some(504),
        /// The store failed internally.
        Internal { message: String } =>
            "document store: internal error: {message}" ; "INTERNAL", Some(500),
        /// Failure without a recognised classification.
        Unknown { message: String } =>
            "document store: {message}" ; "UNKNOWN_ERROR", None,
    }
}

/// Condition a staged write requires at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No requirement.
    None,
    /// The document must exist.
    Exists,
}

/// Write enqueued by a transaction or write batch.
#[derive(Debug, Clone, PartialEq)]
pub enum StagedWrite {
    /// Replace the document, creating it when absent.
    Set {
        collection: String,
        id: DocumentId,
        data: Document,
    },
    /// Merge fields into the document.
    Update {
        collection: String,
        id: DocumentId,
        data: Document,
        precondition: Precondition,
    },
    /// Remove the document; absent documents are ignored.
    Delete { collection: String, id: DocumentId },
}

/// Revision observed by a transactional read.
///
/// `revision` is `None` when the document was absent; it must still be absent
/// at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadCheck {
    pub collection: String,
    pub id: DocumentId,
    pub revision: Option<u64>,
}

/// Writes committed atomically, guarded by the reads they depend on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitRequest {
    pub checks: Vec<ReadCheck>,
    pub writes: Vec<StagedWrite>,
}

impl CommitRequest {
    /// A write batch: no read checks.
    pub fn batch(writes: Vec<StagedWrite>) -> Self {
        Self {
            checks: Vec::new(),
            writes,
        }
    }

    /// Whether there is nothing to verify or apply.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty() && self.writes.is_empty()
    }
}

/// Driven port over a schemaless document store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write a new document. With `id`, replace whatever is stored there;
    /// without, let the store assign one.
    async fn insert(
        &self,
        collection: &str,
        id: Option<DocumentId>,
        data: Document,
    ) -> Result<DocumentId, StoreError>;

    /// Read every document of a collection, in store-defined order.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

    /// Read one document.
    async fn fetch(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError>;

    /// Merge fields into an existing document. Fails with
    /// [`StoreError::NotFound`] when the document is absent.
    async fn merge(
        &self,
        collection: &str,
        id: &DocumentId,
        data: Document,
    ) -> Result<(), StoreError>;

    /// Remove a document; absent documents are ignored.
    async fn remove(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError>;

    /// Read every document matching all filters.
    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<StoredDocument>, StoreError>;

    /// Verify the read checks and apply the writes atomically.
    ///
    /// Fails with [`StoreError::Aborted`] when a checked document changed, and
    /// with [`StoreError::NotFound`] when an update requiring existence
    /// targets an absent document. Nothing is applied on failure.
    async fn commit(&self, request: CommitRequest) -> Result<(), StoreError>;
}
