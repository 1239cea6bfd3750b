//! Typed access to one collection on top of [`DocumentRepository`].
//!
//! [`CollectionService`] holds the behaviour shared by every entity service:
//! decoding stored documents, asserting existence before mutation and
//! re-reading after an update.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::document::{Document, DocumentId, StoredDocument};
use super::error::{Error, RepositoryError, ServiceError};
use super::repository::DocumentRepository;

/// Entity persisted as one document per instance in a named collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection holding the entity's documents.
    const COLLECTION: &'static str;
    /// Payload accepted on creation.
    type Draft: Serialize + Send + Sync;
    /// Payload accepted on partial update; absent fields are not serialised.
    type Patch: Serialize + Send + Sync;

    /// Combine a store-assigned id with the creation payload.
    fn from_draft(id: DocumentId, draft: Self::Draft) -> Self;
}

/// Serialise a payload into document fields.
pub(crate) fn to_document<T: Serialize>(payload: &T) -> Result<Document, Error> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(Error::unexpected(format!(
            "payload serialised to a non-object value: {other}"
        ))),
        Err(err) => Err(Error::unexpected(format!(
            "payload failed to serialise: {err}"
        ))),
    }
}

/// Generic service over the collection of `E`.
pub struct CollectionService<E> {
    repository: DocumentRepository,
    entity: PhantomData<fn() -> E>,
}

impl<E> Clone for CollectionService<E> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            entity: PhantomData,
        }
    }
}

impl<E: Entity> CollectionService<E> {
    /// Bind the service to the repository holding `E::COLLECTION`.
    pub fn new(repository: DocumentRepository) -> Self {
        Self {
            repository,
            entity: PhantomData,
        }
    }

    /// Repository the service reads and writes through.
    pub fn repository(&self) -> &DocumentRepository {
        &self.repository
    }

    /// Identifiers that cannot address a document cannot name an existing
    /// one either, so they are reported as not found.
    pub(crate) fn document_id(raw: &str) -> Result<DocumentId, RepositoryError> {
        DocumentId::new(raw).map_err(|_| RepositoryError::not_found(E::COLLECTION, raw))
    }

    pub(crate) fn decode(document: StoredDocument) -> Result<E, ServiceError> {
        let id = document.id.clone();
        serde_json::from_value(document.into_entity_value())
            .map_err(|err| ServiceError::invalid_document(E::COLLECTION, id.as_str(), err))
    }

    /// Every entity in the collection.
    pub async fn get_all(&self) -> Result<Vec<E>, Error> {
        let documents = self.repository.get_all(E::COLLECTION).await?;
        documents
            .into_iter()
            .map(|document| Self::decode(document).map_err(Error::from))
            .collect()
    }

    /// One entity, or a not-found error.
    pub async fn get_by_id(&self, id: &str) -> Result<E, Error> {
        let id = Self::document_id(id)?;
        let document = self.repository.get_by_id(E::COLLECTION, &id).await?;
        Ok(Self::decode(document)?)
    }

    /// Store a new entity and return it with its assigned id.
    ///
    /// The result is assembled from the payload rather than re-read.
    pub async fn create(&self, draft: E::Draft) -> Result<E, Error> {
        let fields = to_document(&draft)?;
        let id = self.repository.create(E::COLLECTION, fields, None).await?;
        Ok(E::from_draft(id, draft))
    }

    /// Merge the supplied fields into an existing entity and return the
    /// stored result.
    pub async fn update(&self, id: &str, patch: E::Patch) -> Result<E, Error> {
        let id = Self::document_id(id)?;
        self.repository.get_by_id(E::COLLECTION, &id).await?;
        let fields = to_document(&patch)?;
        if !fields.is_empty() {
            self.repository.update(E::COLLECTION, &id, fields).await?;
        }
        let document = self.repository.get_by_id(E::COLLECTION, &id).await?;
        Ok(Self::decode(document)?)
    }

    /// Remove an existing entity.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        let id = Self::document_id(id)?;
        self.repository.get_by_id(E::COLLECTION, &id).await?;
        self.repository.delete(E::COLLECTION, &id).await?;
        Ok(())
    }
}
