//! Tests for the document repository.

use super::*;
use crate::domain::ports::MockDocumentStore;
use rstest::rstest;
use serde_json::json;

fn id(raw: &str) -> DocumentId {
    DocumentId::new(raw).expect("valid id")
}

fn stored(raw: &str, revision: u64) -> StoredDocument {
    StoredDocument {
        id: id(raw),
        data: json!({"branchId": "b1"})
            .as_object()
            .cloned()
            .expect("object literal"),
        revision,
    }
}

fn repository(store: MockDocumentStore) -> DocumentRepository {
    DocumentRepository::new(Arc::new(store))
}

#[tokio::test]
async fn get_by_id_reports_missing_document() {
    let mut store = MockDocumentStore::new();
    store.expect_fetch().times(1).returning(|_, _| Ok(None));

    let err = repository(store)
        .get_by_id("branches", &id("ghost-id"))
        .await
        .expect_err("document is absent");

    assert_eq!(err.code(), "DOC_NOT_FOUND");
    assert_eq!(err.http_status(), 404);
    assert_eq!(
        err.message(),
        "Document not found in branches with id ghost-id"
    );
}

#[rstest]
#[case(StoreError::unavailable("socket closed"), "UNAVAILABLE", 503)]
#[case(StoreError::permission_denied("rules"), "PERMISSION_DENIED", 403)]
#[case(StoreError::unknown("boom"), "UNKNOWN_ERROR", 500)]
#[tokio::test]
async fn store_failures_are_normalised(
    #[case] failure: StoreError,
    #[case] code: &str,
    #[case] status: u16,
) {
    let mut store = MockDocumentStore::new();
    store
        .expect_fetch_all()
        .times(1)
        .returning(move |_| Err(failure.clone()));

    let err = repository(store)
        .get_all("employees")
        .await
        .expect_err("store failed");

    assert_eq!(err.code(), code);
    assert_eq!(err.http_status(), status);
    assert!(
        err.message()
            .starts_with("Failed to fetch documents from employees: ")
    );
}

#[tokio::test]
async fn create_forwards_explicit_id() {
    let mut store = MockDocumentStore::new();
    store
        .expect_insert()
        .withf(|collection, id, _| {
            collection == "branches" && id.as_ref().map(DocumentId::as_str) == Some("b1")
        })
        .times(1)
        .returning(|_, id, _| Ok(id.expect("explicit id forwarded")));

    let created = repository(store)
        .create("branches", Document::new(), Some(id("b1")))
        .await
        .expect("create succeeds");

    assert_eq!(created, id("b1"));
}

#[tokio::test]
async fn delete_by_filter_with_no_matches_skips_commit() {
    let mut store = MockDocumentStore::new();
    store.expect_query().times(1).returning(|_, _| Ok(Vec::new()));
    store.expect_commit().never();

    let deleted = repository(store)
        .delete_by_filter("employees", &[FieldFilter::eq("branchId", "b9")], None)
        .await
        .expect("zero matches succeeds");

    assert_eq!(deleted, 0);
}

#[tokio::test]
async fn delete_by_filter_without_transaction_commits_one_batch() {
    let mut store = MockDocumentStore::new();
    store
        .expect_query()
        .times(1)
        .returning(|_, _| Ok(vec![stored("e1", 1), stored("e2", 4)]));
    store
        .expect_commit()
        .withf(|request| request.checks.is_empty() && request.writes.len() == 2)
        .times(1)
        .returning(|_| Ok(()));

    let deleted = repository(store)
        .delete_by_filter("employees", &[FieldFilter::eq("branchId", "b1")], None)
        .await
        .expect("batch delete succeeds");

    assert_eq!(deleted, 2);
}

#[tokio::test]
async fn transactional_delete_records_reads_and_commits_once() {
    let mut store = MockDocumentStore::new();
    store
        .expect_query()
        .times(1)
        .returning(|_, _| Ok(vec![stored("e1", 3)]));
    store
        .expect_commit()
        .withf(|request| {
            request.checks
                == [ReadCheck {
                    collection: "employees".to_owned(),
                    id: DocumentId::new("e1").expect("valid id"),
                    revision: Some(3),
                }]
                && request.writes
                    == [StagedWrite::Delete {
                        collection: "employees".to_owned(),
                        id: DocumentId::new("e1").expect("valid id"),
                    }]
        })
        .times(1)
        .returning(|_| Ok(()));
    let repo = repository(store);

    let deleted = repo
        .run_transaction(|tx| {
            let repo = repo.clone();
            async move {
                repo.delete_by_filter("employees", &[FieldFilter::eq("branchId", "b1")], Some(&tx))
                    .await
            }
        })
        .await
        .expect("transaction commits");

    assert_eq!(deleted, 1);
}

#[tokio::test]
async fn failed_operation_skips_commit_and_is_wrapped() {
    let mut store = MockDocumentStore::new();
    store.expect_commit().never();

    let err = repository(store)
        .run_transaction(|_tx| async {
            Err::<(), _>(RepositoryError::new("conflict", "ABORTED", 409))
        })
        .await
        .expect_err("operation failed");

    assert_eq!(err.code(), TRANSACTION_FAILED);
    assert_eq!(err.http_status(), 409);
    assert_eq!(err.message(), "Transaction failed: conflict");
}

#[tokio::test]
async fn commit_aborted_on_every_attempt_is_wrapped_with_store_status() {
    let mut store = MockDocumentStore::new();
    store
        .expect_commit()
        .times(MAX_TRANSACTION_ATTEMPTS)
        .returning(|_| Err(StoreError::aborted("e1 changed")));

    let err = repository(store)
        .run_transaction(|tx| async move {
            tx.delete("employees", DocumentId::new("e1").expect("valid id"));
            Ok(())
        })
        .await
        .expect_err("commit rejected");

    assert_eq!(err.code(), TRANSACTION_FAILED);
    assert_eq!(err.http_status(), 409);
    assert!(err.message().starts_with("Transaction failed: "));
    assert!(err.message().contains("e1 changed"));
}

#[tokio::test]
async fn aborted_commit_reruns_the_operation() {
    let mut store = MockDocumentStore::new();
    let mut seq = mockall::Sequence::new();
    store
        .expect_commit()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(StoreError::aborted("e1 changed")));
    store
        .expect_commit()
        .withf(|request| request.writes.len() == 1)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    let runs = std::sync::atomic::AtomicUsize::new(0);

    let outcome = repository(store)
        .run_transaction(|tx| {
            let run = runs.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
            async move {
                tx.delete("employees", DocumentId::new("e1").expect("valid id"));
                Ok(run)
            }
        })
        .await
        .expect("second attempt commits");

    assert_eq!(outcome, 2);
}

#[tokio::test]
async fn non_contention_commit_failures_are_not_retried() {
    let mut store = MockDocumentStore::new();
    store
        .expect_commit()
        .times(1)
        .returning(|_| Err(StoreError::unavailable("connection refused")));

    let err = repository(store)
        .run_transaction(|tx| async move {
            tx.delete("employees", DocumentId::new("e1").expect("valid id"));
            Ok(())
        })
        .await
        .expect_err("store unavailable");

    assert_eq!(err.code(), TRANSACTION_FAILED);
    assert_eq!(err.http_status(), 503);
}
