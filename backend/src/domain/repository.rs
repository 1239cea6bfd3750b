//! Generic document repository over the [`DocumentStore`] port.
//!
//! Every operation addresses a named collection. Store failures are caught
//! here and re-raised as [`RepositoryError`] values carrying a descriptive
//! prefix, the normalised backend code and the mapped HTTP status; no
//! [`StoreError`] escapes this module.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::document::{Document, DocumentId, FieldFilter, StoredDocument};
use super::error::{INTERNAL_STATUS, RepositoryError, TRANSACTION_FAILED};
use super::ports::{
    CommitRequest, DocumentStore, Precondition, ReadCheck, StagedWrite, StoreError,
};

/// Attempts [`DocumentRepository::run_transaction`] makes before giving up
/// on a contended commit.
pub const MAX_TRANSACTION_ATTEMPTS: usize = 5;

fn normalise(context: String, error: StoreError) -> RepositoryError {
    debug!(code = error.code(), %error, "document store operation failed");
    RepositoryError::new(
        format!("{context}: {error}"),
        error.code(),
        error.http_status().unwrap_or(INTERNAL_STATUS),
    )
}

fn with_context(context: String, error: RepositoryError) -> RepositoryError {
    RepositoryError::new(
        format!("{context}: {}", error.message()),
        error.code(),
        error.http_status(),
    )
}

/// Repository offering collection-level CRUD, filtered deletes and
/// transactions.
#[derive(Clone)]
pub struct DocumentRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentRepository {
    /// Bind the repository to a store adapter.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a document and return its id.
    ///
    /// With `id`, the document is set at that id, replacing any existing
    /// content; otherwise the store assigns a fresh id.
    pub async fn create(
        &self,
        collection: &str,
        data: Document,
        id: Option<DocumentId>,
    ) -> Result<DocumentId, RepositoryError> {
        self.store
            .insert(collection, id, data)
            .await
            .map_err(|err| normalise(format!("Failed to create document in {collection}"), err))
    }

    /// Read every document in the collection. Ordering is store-defined.
    pub async fn get_all(&self, collection: &str) -> Result<Vec<StoredDocument>, RepositoryError> {
        self.store.fetch_all(collection).await.map_err(|err| {
            normalise(format!("Failed to fetch documents from {collection}"), err)
        })
    }

    /// Read one document, failing with `DOC_NOT_FOUND` (404) when absent.
    pub async fn get_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<StoredDocument, RepositoryError> {
        self.store
            .fetch(collection, id)
            .await
            .map_err(|err| {
                normalise(
                    format!("Failed to fetch document {id} from {collection}"),
                    err,
                )
            })?
            .ok_or_else(|| RepositoryError::not_found(collection, id.as_str()))
    }

    /// Merge `data` into the document; fields not supplied stay untouched.
    ///
    /// No existence check is made beforehand. Callers needing a clean
    /// not-found error call [`Self::get_by_id`] first.
    pub async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        data: Document,
    ) -> Result<(), RepositoryError> {
        self.store.merge(collection, id, data).await.map_err(|err| {
            normalise(format!("Failed to update document {id} in {collection}"), err)
        })
    }

    /// Remove the document. Removing an absent document is a no-op.
    pub async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), RepositoryError> {
        self.store.remove(collection, id).await.map_err(|err| {
            normalise(
                format!("Failed to delete document {id} from {collection}"),
                err,
            )
        })
    }

    /// Delete every document matching all `filters`.
    ///
    /// Inside a transaction the matches are read through it and the deletes
    /// are enqueued for its commit. Otherwise the matches are removed in one
    /// atomic write batch. Returns the number of documents deleted or
    /// enqueued; zero matches is not an error.
    pub async fn delete_by_filter(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        transaction: Option<&Transaction>,
    ) -> Result<usize, RepositoryError> {
        let context =
            || format!("Failed to delete documents from {collection} by field-value pairs");

        if let Some(transaction) = transaction {
            let matches = transaction
                .query(collection, filters)
                .await
                .map_err(|err| with_context(context(), err))?;
            let count = matches.len();
            for document in matches {
                transaction.delete(collection, document.id);
            }
            return Ok(count);
        }

        let matches = self
            .store
            .query(collection, filters)
            .await
            .map_err(|err| normalise(context(), err))?;
        if matches.is_empty() {
            return Ok(0);
        }
        let count = matches.len();
        let writes = matches
            .into_iter()
            .map(|document| StagedWrite::Delete {
                collection: collection.to_owned(),
                id: document.id,
            })
            .collect();
        self.store
            .commit(CommitRequest::batch(writes))
            .await
            .map_err(|err| normalise(context(), err))?;
        Ok(count)
    }

    /// Run `operation` with a fresh transaction and commit its writes.
    ///
    /// When the commit is aborted by a concurrent write, the operation is run
    /// again against a new transaction, up to [`MAX_TRANSACTION_ATTEMPTS`]
    /// times in total. The commit is skipped when the operation fails. Any
    /// failure, from the operation or the final commit, is reported with code
    /// `TRANSACTION_FAILED`, the original message and the original status.
    ///
    /// # Examples
    /// ```no_run
    /// use workforce::domain::{DocumentRepository, FieldFilter, RepositoryError};
    ///
    /// async fn purge(repo: &DocumentRepository) -> Result<usize, RepositoryError> {
    ///     repo.run_transaction(|tx| async move {
    ///         repo.delete_by_filter("employees", &[FieldFilter::eq("branchId", "b1")], Some(&tx))
    ///             .await
    ///     })
    ///     .await
    /// }
    /// ```
    pub async fn run_transaction<T, F, Fut>(&self, operation: F) -> Result<T, RepositoryError>
    where
        F: Fn(Transaction) -> Fut,
        Fut: Future<Output = Result<T, RepositoryError>>,
    {
        let mut attempt = 1;
        let outcome = loop {
            let transaction = Transaction::new(Arc::clone(&self.store));
            let value = match operation(transaction.clone()).await {
                Ok(value) => value,
                Err(err) => break Err(err),
            };
            match self.store.commit(transaction.take_request()).await {
                Ok(()) => break Ok(value),
                Err(StoreError::Aborted { message }) if attempt < MAX_TRANSACTION_ATTEMPTS => {
                    debug!(attempt, %message, "transaction aborted, retrying");
                    attempt += 1;
                }
                Err(err) => break Err(normalise("Commit rejected".to_owned(), err)),
            }
        };
        outcome.map_err(|err| {
            RepositoryError::new(
                format!("Transaction failed: {}", err.message()),
                TRANSACTION_FAILED,
                err.http_status(),
            )
        })
    }
}

/// Handle passed to a transactional operation.
///
/// Reads go straight to the store and are recorded; writes are enqueued and
/// applied only when the transaction commits. The commit fails if any
/// document read has changed since. Reads observe committed state only;
/// writes enqueued earlier in the same transaction are not visible to them.
#[derive(Clone)]
pub struct Transaction {
    store: Arc<dyn DocumentStore>,
    state: Arc<Mutex<CommitRequest>>,
}

impl Transaction {
    fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            state: Arc::new(Mutex::new(CommitRequest::default())),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut CommitRequest) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn record_read(&self, collection: &str, id: &DocumentId, revision: Option<u64>) {
        self.with_state(|state| {
            let seen = state
                .checks
                .iter()
                .any(|check| check.collection == collection && check.id == *id);
            if !seen {
                state.checks.push(ReadCheck {
                    collection: collection.to_owned(),
                    id: id.clone(),
                    revision,
                });
            }
        });
    }

    fn stage(&self, write: StagedWrite) {
        self.with_state(|state| state.writes.push(write));
    }

    fn take_request(&self) -> CommitRequest {
        self.with_state(std::mem::take)
    }

    /// Read a document and record its revision.
    pub async fn get(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, RepositoryError> {
        let document = self.store.fetch(collection, id).await.map_err(|err| {
            normalise(
                format!("Failed to fetch document {id} from {collection}"),
                err,
            )
        })?;
        self.record_read(collection, id, document.as_ref().map(|doc| doc.revision));
        Ok(document)
    }

    /// Read documents matching all filters and record their revisions.
    pub async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<StoredDocument>, RepositoryError> {
        let documents = self
            .store
            .query(collection, filters)
            .await
            .map_err(|err| normalise(format!("Failed to query {collection}"), err))?;
        for document in &documents {
            self.record_read(collection, &document.id, Some(document.revision));
        }
        Ok(documents)
    }

    /// Enqueue a full replacement of the document.
    pub fn set(&self, collection: &str, id: DocumentId, data: Document) {
        self.stage(StagedWrite::Set {
            collection: collection.to_owned(),
            id,
            data,
        });
    }

    /// Enqueue a field merge; the document must exist at commit time.
    pub fn update(&self, collection: &str, id: DocumentId, data: Document) {
        self.stage(StagedWrite::Update {
            collection: collection.to_owned(),
            id,
            data,
            precondition: Precondition::Exists,
        });
    }

    /// Enqueue a delete.
    pub fn delete(&self, collection: &str, id: DocumentId) {
        self.stage(StagedWrite::Delete {
            collection: collection.to_owned(),
            id,
        });
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
