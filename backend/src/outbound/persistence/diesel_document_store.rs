//! PostgreSQL-backed [`DocumentStore`] keeping documents as JSONB rows.
//!
//! All collections share the `documents` table. Equality filters become
//! `data @> {field: value}` containment predicates, merges use the JSONB
//! `||` operator, and every write stamps the row with the next value of the
//! store-wide revision sequence. Commits run in one database transaction,
//! locking each checked row before comparing revisions.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::InsertStatement;
use diesel::sql_types::BigInt;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde_json::{Map, Value};

use crate::domain::ports::{
    CommitRequest, DocumentStore, Precondition, ReadCheck, StagedWrite, StoreError,
};
use crate::domain::{Document, DocumentId, FieldFilter, StoredDocument};

use super::models::{DocumentRow, NewDocumentRow};
use super::pool::DbPool;
use super::schema::documents;
use super::store_error_mapping::{map_diesel_error, map_pool_error};

const NEXT_REVISION: &str = "nextval('documents_revision_seq')";

fn next_revision() -> diesel::expression::SqlLiteral<BigInt> {
    sql::<BigInt>(NEXT_REVISION)
}

/// Failure inside a commit: either a rejected check or a database error.
#[derive(Debug)]
enum CommitFailure {
    Rejected(StoreError),
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for CommitFailure {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

impl From<CommitFailure> for StoreError {
    fn from(failure: CommitFailure) -> Self {
        match failure {
            CommitFailure::Rejected(error) => error,
            CommitFailure::Database(error) => map_diesel_error(error),
        }
    }
}

fn containment(filter: &FieldFilter) -> Value {
    let mut object = Map::new();
    object.insert(filter.field.clone(), filter.value.to_json());
    Value::Object(object)
}

fn row_to_document(row: DocumentRow) -> Result<StoredDocument, StoreError> {
    let id = DocumentId::new(row.id.as_str())
        .map_err(|err| StoreError::internal(format!("stored id {:?}: {err}", row.id)))?;
    let revision = u64::try_from(row.revision)
        .map_err(|_| StoreError::internal(format!("negative revision on {id}")))?;
    let Value::Object(data) = row.data else {
        return Err(StoreError::internal(format!("document {id} is not an object")));
    };
    Ok(StoredDocument { id, data, revision })
}

fn rows_to_documents(rows: Vec<DocumentRow>) -> Result<Vec<StoredDocument>, StoreError> {
    rows.into_iter().map(row_to_document).collect()
}

/// Plain insert of a new row; a key collision surfaces as a unique
/// violation.
fn fresh_insert<'a>(
    row: &'a NewDocumentRow<'a>,
) -> InsertStatement<documents::table, <&'a NewDocumentRow<'a> as Insertable<documents::table>>::Values>
{
    diesel::insert_into(documents::table).values(row)
}

async fn upsert(
    conn: &mut AsyncPgConnection,
    collection: &str,
    id: &DocumentId,
    data: Document,
) -> Result<(), diesel::result::Error> {
    let row = NewDocumentRow {
        collection,
        id: id.as_str(),
        data: Value::Object(data),
    };
    diesel::insert_into(documents::table)
        .values(&row)
        .on_conflict((documents::collection, documents::id))
        .do_update()
        .set((
            documents::data.eq(excluded(documents::data)),
            documents::revision.eq(next_revision()),
        ))
        .execute(conn)
        .await
        .map(|_| ())
}

/// Merge `data` into an existing row; returns the number of rows touched.
async fn merge_row(
    conn: &mut AsyncPgConnection,
    collection: &str,
    id: &DocumentId,
    data: Document,
) -> Result<usize, diesel::result::Error> {
    diesel::update(
        documents::table
            .filter(documents::collection.eq(collection))
            .filter(documents::id.eq(id.as_str())),
    )
    .set((
        documents::data.eq(documents::data.concat(Value::Object(data))),
        documents::revision.eq(next_revision()),
    ))
    .execute(conn)
    .await
}

async fn delete_row(
    conn: &mut AsyncPgConnection,
    collection: &str,
    id: &DocumentId,
) -> Result<usize, diesel::result::Error> {
    diesel::delete(
        documents::table
            .filter(documents::collection.eq(collection))
            .filter(documents::id.eq(id.as_str())),
    )
    .execute(conn)
    .await
}

async fn verify(conn: &mut AsyncPgConnection, check: &ReadCheck) -> Result<(), CommitFailure> {
    let current: Option<i64> = documents::table
        .filter(documents::collection.eq(check.collection.as_str()))
        .filter(documents::id.eq(check.id.as_str()))
        .select(documents::revision)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let current = current.and_then(|revision| u64::try_from(revision).ok());
    if current == check.revision {
        Ok(())
    } else {
        Err(CommitFailure::Rejected(StoreError::aborted(format!(
            "{}/{} changed since it was read",
            check.collection, check.id
        ))))
    }
}

async fn apply(conn: &mut AsyncPgConnection, write: StagedWrite) -> Result<(), CommitFailure> {
    match write {
        StagedWrite::Set {
            collection,
            id,
            data,
        } => upsert(conn, &collection, &id, data).await?,
        StagedWrite::Update {
            collection,
            id,
            data,
            precondition,
        } => {
            let touched = merge_row(conn, &collection, &id, data.clone()).await?;
            match (touched, precondition) {
                (0, Precondition::Exists) => {
                    return Err(CommitFailure::Rejected(StoreError::not_found(format!(
                        "no document to update at {collection}/{id}"
                    ))));
                }
                (0, Precondition::None) => upsert(conn, &collection, &id, data).await?,
                _ => {}
            }
        }
        StagedWrite::Delete { collection, id } => {
            delete_row(conn, &collection, &id).await?;
        }
    }
    Ok(())
}

/// Diesel-backed implementation of the [`DocumentStore`] port.
#[derive(Clone)]
pub struct DieselDocumentStore {
    pool: DbPool,
}

impl DieselDocumentStore {
    /// Create a store with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use workforce::outbound::persistence::{DbPool, DieselDocumentStore, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/workforce")).await?;
    /// let store = DieselDocumentStore::new(pool);
    /// # let _ = store;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for DieselDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        id: Option<DocumentId>,
        data: Document,
    ) -> Result<DocumentId, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        if let Some(id) = id {
            upsert(&mut conn, collection, &id, data)
                .await
                .map_err(map_diesel_error)?;
            return Ok(id);
        }
        let id = DocumentId::generate();
        let row = NewDocumentRow {
            collection,
            id: id.as_str(),
            data: Value::Object(data),
        };
        fresh_insert(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(id)
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DocumentRow> = documents::table
            .filter(documents::collection.eq(collection))
            .order_by(documents::id)
            .select(DocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_documents(rows)
    }

    async fn fetch(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DocumentRow> = documents::table
            .filter(documents::collection.eq(collection))
            .filter(documents::id.eq(id.as_str()))
            .select(DocumentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_document).transpose()
    }

    async fn merge(
        &self,
        collection: &str,
        id: &DocumentId,
        data: Document,
    ) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let touched = merge_row(&mut conn, collection, id, data)
            .await
            .map_err(map_diesel_error)?;
        if touched == 0 {
            return Err(StoreError::not_found(format!(
                "no document to update at {collection}/{id}"
            )));
        }
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        delete_row(&mut conn, collection, id)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = documents::table
            .filter(documents::collection.eq(collection))
            .select(DocumentRow::as_select())
            .order_by(documents::id)
            .into_boxed::<Pg>();
        for filter in filters {
            query = query.filter(documents::data.contains(containment(filter)));
        }
        let rows: Vec<DocumentRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows_to_documents(rows)
    }

    async fn commit(&self, request: CommitRequest) -> Result<(), StoreError> {
        if request.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let CommitRequest { checks, writes } = request;
        conn.transaction(|conn| {
            async move {
                for check in &checks {
                    verify(conn, check).await?;
                }
                for write in writes {
                    apply(conn, write).await?;
                }
                Ok::<(), CommitFailure>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(StoreError::from)
    }
}
