//! Process-local [`DocumentStore`] adapter.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! Collections live behind one mutex; no lock is held across an await point.
//! Revisions come from a store-wide clock, so a document deleted and created
//! again never reuses a revision a transaction may have observed.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    CommitRequest, DocumentStore, Precondition, ReadCheck, StagedWrite, StoreError,
};
use crate::domain::{Document, DocumentId, FieldFilter, StoredDocument, matches_all};

#[derive(Debug, Clone)]
struct Entry {
    data: Document,
    revision: u64,
}

type Collection = BTreeMap<DocumentId, Entry>;

#[derive(Debug, Default)]
struct State {
    collections: HashMap<String, Collection>,
    clock: u64,
}

impl State {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    fn revision_of(&self, collection: &str, id: &DocumentId) -> Option<u64> {
        self.collection(collection)
            .and_then(|docs| docs.get(id))
            .map(|entry| entry.revision)
    }
}

fn stored(id: &DocumentId, entry: &Entry) -> StoredDocument {
    StoredDocument {
        id: id.clone(),
        data: entry.data.clone(),
        revision: entry.revision,
    }
}

fn check_read(state: &State, check: &ReadCheck) -> Result<(), StoreError> {
    let current = state.revision_of(&check.collection, &check.id);
    if current == check.revision {
        Ok(())
    } else {
        Err(StoreError::aborted(format!(
            "{}/{} changed since it was read",
            check.collection, check.id
        )))
    }
}

/// Apply one write to a scratch copy of the affected collections.
fn apply(
    scratch: &mut HashMap<String, Collection>,
    revision: u64,
    write: StagedWrite,
) -> Result<(), StoreError> {
    match write {
        StagedWrite::Set {
            collection,
            id,
            data,
        } => {
            scratch
                .entry(collection)
                .or_default()
                .insert(id, Entry { data, revision });
        }
        StagedWrite::Update {
            collection,
            id,
            data,
            precondition,
        } => {
            let docs = scratch.entry(collection.clone()).or_default();
            match (docs.get_mut(&id), precondition) {
                (Some(entry), _) => {
                    entry.data.extend(data);
                    entry.revision = revision;
                }
                (None, Precondition::Exists) => {
                    return Err(StoreError::not_found(format!(
                        "no document to update at {collection}/{id}"
                    )));
                }
                (None, Precondition::None) => {
                    docs.insert(id, Entry { data, revision });
                }
            }
        }
        StagedWrite::Delete { collection, id } => {
            if let Some(docs) = scratch.get_mut(&collection) {
                docs.remove(&id);
            }
        }
    }
    Ok(())
}

fn collection_of(write: &StagedWrite) -> &str {
    match write {
        StagedWrite::Set { collection, .. }
        | StagedWrite::Update { collection, .. }
        | StagedWrite::Delete { collection, .. } => collection,
    }
}

/// In-memory document store.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    state: Mutex<State>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        id: Option<DocumentId>,
        data: Document,
    ) -> Result<DocumentId, StoreError> {
        let mut state = self.lock();
        let revision = state.tick();
        let docs = state.collections.entry(collection.to_owned()).or_default();
        let id = match id {
            Some(id) => id,
            None => loop {
                let candidate = DocumentId::generate();
                if !docs.contains_key(&candidate) {
                    break candidate;
                }
            },
        };
        docs.insert(id.clone(), Entry { data, revision });
        debug!(collection, id = %id, revision, "document written");
        Ok(id)
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let state = self.lock();
        Ok(state
            .collection(collection)
            .map(|docs| docs.iter().map(|(id, entry)| stored(id, entry)).collect())
            .unwrap_or_default())
    }

    async fn fetch(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let state = self.lock();
        Ok(state
            .collection(collection)
            .and_then(|docs| docs.get(id))
            .map(|entry| stored(id, entry)))
    }

    async fn merge(
        &self,
        collection: &str,
        id: &DocumentId,
        data: Document,
    ) -> Result<(), StoreError> {
        let mut state = self.lock();
        let revision = state.tick();
        let entry = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| {
                StoreError::not_found(format!("no document to update at {collection}/{id}"))
            })?;
        entry.data.extend(data);
        entry.revision = revision;
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        let mut state = self.lock();
        if let Some(docs) = state.collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let state = self.lock();
        Ok(state
            .collection(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, entry)| matches_all(filters, &entry.data))
                    .map(|(id, entry)| stored(id, entry))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn commit(&self, request: CommitRequest) -> Result<(), StoreError> {
        if request.is_empty() {
            return Ok(());
        }
        let mut state = self.lock();
        for check in &request.checks {
            check_read(&state, check)?;
        }

        let mut scratch: HashMap<String, Collection> = HashMap::new();
        for write in &request.writes {
            let name = collection_of(write);
            if !scratch.contains_key(name) {
                let current = state.collection(name).cloned().unwrap_or_default();
                scratch.insert(name.to_owned(), current);
            }
        }

        let revision = state.tick();
        let write_count = request.writes.len();
        for write in request.writes {
            apply(&mut scratch, revision, write)?;
        }
        state.collections.extend(scratch);
        debug!(
            checks = request.checks.len(),
            writes = write_count,
            revision,
            "commit applied"
        );
        Ok(())
    }
}
