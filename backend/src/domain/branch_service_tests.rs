//! Tests for the branch service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockDocumentStore, StoreError};
use crate::domain::{Document, DocumentId, StoredDocument};
use mockall::Sequence;
use serde_json::{Value, json};

fn fields(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("fixture must be an object"),
    }
}

fn stored(id: &str, value: Value) -> StoredDocument {
    StoredDocument {
        id: DocumentId::new(id).expect("valid id"),
        data: fields(value),
        revision: 1,
    }
}

fn service(store: MockDocumentStore) -> DocumentBranchService {
    DocumentBranchService::new(DocumentRepository::new(Arc::new(store)))
}

#[tokio::test]
async fn create_returns_payload_with_assigned_id_without_rereading() {
    let mut store = MockDocumentStore::new();
    store
        .expect_insert()
        .withf(|collection, id, data| {
            collection == "branches"
                && id.is_none()
                && data.get("name") == Some(&json!("Main"))
                && !data.contains_key("id")
        })
        .times(1)
        .returning(|_, _, _| Ok(DocumentId::new("b1").expect("valid id")));
    store.expect_fetch().never();

    let branch = service(store)
        .create(NewBranch {
            name: "Main".to_owned(),
            address: "1 High Street".to_owned(),
            phone: "555-0100".to_owned(),
        })
        .await
        .expect("create succeeds");

    assert_eq!(branch.id.as_str(), "b1");
    assert_eq!(branch.name, "Main");
}

#[tokio::test]
async fn update_checks_existence_then_merges_then_rereads() {
    let mut store = MockDocumentStore::new();
    let mut seq = Sequence::new();
    store
        .expect_fetch()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| {
            Ok(Some(stored(
                "b1",
                json!({"name": "Main", "address": "1 High Street", "phone": "555-0100"}),
            )))
        });
    store
        .expect_merge()
        .withf(|_, id, data| id.as_str() == "b1" && data.len() == 1 && data.contains_key("phone"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    store
        .expect_fetch()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| {
            Ok(Some(stored(
                "b1",
                json!({"name": "Main", "address": "1 High Street", "phone": "555-0199"}),
            )))
        });

    let branch = service(store)
        .update(
            "b1",
            BranchPatch {
                phone: Some("555-0199".to_owned()),
                ..BranchPatch::default()
            },
        )
        .await
        .expect("update succeeds");

    assert_eq!(branch.phone, "555-0199");
    assert_eq!(branch.name, "Main");
}

#[tokio::test]
async fn delete_of_missing_branch_reports_not_found_and_skips_remove() {
    let mut store = MockDocumentStore::new();
    store.expect_fetch().times(1).returning(|_, _| Ok(None));
    store.expect_remove().never();

    let err = service(store)
        .delete("ghost-id")
        .await
        .expect_err("branch is absent");

    assert_eq!(err.http_status(), 404);
    assert_eq!(err.code(), "DOC_NOT_FOUND");
}

#[tokio::test]
async fn unaddressable_id_is_not_found() {
    let mut store = MockDocumentStore::new();
    store.expect_fetch().never();

    let err = service(store)
        .get_by_id("a/b")
        .await
        .expect_err("id cannot exist");

    assert_eq!(err.http_status(), 404);
}

#[tokio::test]
async fn malformed_document_is_a_service_error() {
    let mut store = MockDocumentStore::new();
    store
        .expect_fetch_all()
        .times(1)
        .returning(|_| Ok(vec![stored("b1", json!({"name": 3}))]));

    let err = service(store).get_all().await.expect_err("malformed");

    assert!(matches!(err, Error::Service(_)));
    assert_eq!(err.code(), "INVALID_DOCUMENT");
    assert_eq!(err.http_status(), 500);
}

#[tokio::test]
async fn store_outage_propagates_status() {
    let mut store = MockDocumentStore::new();
    store
        .expect_fetch_all()
        .times(1)
        .returning(|_| Err(StoreError::unavailable("connection refused")));

    let err = service(store).get_all().await.expect_err("store down");

    assert!(matches!(err, Error::Repository(_)));
    assert_eq!(err.http_status(), 503);
}
