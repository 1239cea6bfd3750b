//! End-to-end HTTP flows over the in-memory document store.
//!
//! Requests travel through the real handlers, validation stage, services and
//! repository; only the storage backend is swapped for the in-process one.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use rstest::rstest;
use serde_json::{Value, json};
use workforce::Trace;
use workforce::inbound::http::configure_api;
use workforce::inbound::http::state::HttpState;
use workforce::middleware::TRACE_ID_HEADER;
use workforce::outbound::memory::InMemoryDocumentStore;

async fn init_app()
-> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let state = HttpState::from_store(Arc::new(InMemoryDocumentStore::new()));
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await
}

async fn send<S>(app: &S, req: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

fn branch_payload() -> Value {
    json!({"name": "Downtown", "address": "12 Market Street", "phone": "555-0100"})
}

fn employee_payload(name: &str, department: &str, branch_id: Value) -> Value {
    json!({
        "name": name,
        "position": "Analyst",
        "department": department,
        "email": "staff@example.com",
        "phone": "555-0101",
        "branchId": branch_id,
    })
}

async fn create<S>(app: &S, uri: &str, payload: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(app, TestRequest::post().uri(uri).set_json(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["data"].clone()
}

#[actix_web::test]
async fn created_branch_can_be_read_back() {
    let app = init_app().await;
    let created = create(&app, "/api/v1/branches", branch_payload()).await;
    let id = created["id"].as_str().expect("assigned id");
    assert!(!id.is_empty());

    let (status, body) = send(
        &app,
        TestRequest::get().uri(&format!("/api/v1/branches/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Branch Retrieved");
    assert_eq!(body["data"], created);

    let (_, listed) = send(&app, TestRequest::get().uri("/api/v1/branches")).await;
    assert_eq!(listed["data"], json!([created]));
}

#[actix_web::test]
async fn partial_update_changes_only_the_phone() {
    let app = init_app().await;
    let created = create(&app, "/api/v1/branches", branch_payload()).await;
    let id = created["id"].as_str().expect("assigned id");

    let (status, body) = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/v1/branches/{id}"))
            .set_json(json!({"phone": "555-0199"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Branch Updated");
    assert_eq!(body["data"]["phone"], "555-0199");
    assert_eq!(body["data"]["name"], created["name"]);
    assert_eq!(body["data"]["address"], created["address"]);
}

#[rstest]
#[case(TestRequest::get().uri("/api/v1/branches/ghost-id"), "branches")]
#[case(
    TestRequest::put().uri("/api/v1/branches/ghost-id").set_json(json!({"phone": "555-0199"})),
    "branches"
)]
#[case(TestRequest::delete().uri("/api/v1/branches/ghost-id"), "branches")]
#[case(TestRequest::get().uri("/api/v1/employees/ghost-id"), "employees")]
#[case(
    TestRequest::put().uri("/api/v1/employees/ghost-id").set_json(json!({"name": "Ada"})),
    "employees"
)]
#[case(TestRequest::delete().uri("/api/v1/employees/ghost-id"), "employees")]
#[actix_web::test]
async fn missing_documents_are_reported_as_not_found(
    #[case] req: TestRequest,
    #[case] collection: &str,
) {
    let app = init_app().await;
    let res = test::call_service(&app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({
            "message": format!("Document not found in {collection} with id ghost-id"),
            "code": "DOC_NOT_FOUND",
        })
    );
}

#[actix_web::test]
async fn deleted_branch_is_gone_but_its_employees_remain() {
    let app = init_app().await;
    let branch = create(&app, "/api/v1/branches", branch_payload()).await;
    let branch_id = branch["id"].as_str().expect("assigned id");
    create(
        &app,
        "/api/v1/employees",
        employee_payload("Ada", "Engineering", json!(branch_id)),
    )
    .await;

    let (status, body) = send(
        &app,
        TestRequest::delete().uri(&format!("/api/v1/branches/{branch_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Branch Deleted"}));

    let (status, _) = send(
        &app,
        TestRequest::get().uri(&format!("/api/v1/branches/{branch_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, employees) = send(
        &app,
        TestRequest::get().uri(&format!("/api/v1/employees/branch/{branch_id}")),
    )
    .await;
    assert_eq!(employees["data"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn department_filter_ignores_case() {
    let app = init_app().await;
    create(
        &app,
        "/api/v1/employees",
        employee_payload("Ada", "Engineering", json!("b1")),
    )
    .await;
    create(
        &app,
        "/api/v1/employees",
        employee_payload("Grace", "Sales", json!("b1")),
    )
    .await;

    let (status, body) = send(
        &app,
        TestRequest::get().uri("/api/v1/employees/department/ENGINEERING"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Employees by Department Retrieved");
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("employee list")
        .iter()
        .filter_map(|employee| employee["name"].as_str())
        .collect();
    assert_eq!(names, ["Ada"]);
}

#[actix_web::test]
async fn branch_filter_matches_numeric_and_text_references() {
    let app = init_app().await;
    create(
        &app,
        "/api/v1/employees",
        employee_payload("Ada", "Engineering", json!(12)),
    )
    .await;
    create(
        &app,
        "/api/v1/employees",
        employee_payload("Grace", "Engineering", json!("12")),
    )
    .await;
    create(
        &app,
        "/api/v1/employees",
        employee_payload("Linus", "Engineering", json!("13")),
    )
    .await;

    let (_, body) = send(&app, TestRequest::get().uri("/api/v1/employees/branch/12")).await;
    assert_eq!(body["message"], "Employees for Branch Retrieved");
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn bulk_delete_removes_every_spelling_of_the_branch() {
    let app = init_app().await;
    for branch_id in [json!(7), json!("7"), json!("8")] {
        create(
            &app,
            "/api/v1/employees",
            employee_payload("Ada", "Engineering", branch_id),
        )
        .await;
    }

    let (status, body) = send(
        &app,
        TestRequest::delete().uri("/api/v1/employees/branch/7"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "Employees for Branch Deleted", "data": {"deleted": 2}})
    );

    let (_, remaining) = send(&app, TestRequest::get().uri("/api/v1/employees")).await;
    let remaining = remaining["data"].as_array().expect("employee list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["branchId"], "8");
}

#[actix_web::test]
async fn bulk_delete_without_matches_reports_zero() {
    let app = init_app().await;
    let (status, body) = send(
        &app,
        TestRequest::delete().uri("/api/v1/employees/branch/nobody"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"deleted": 0}));
}

#[rstest]
#[case(
    "/api/v1/branches",
    json!({"name": "D", "address": "12 Market Street", "phone": "555"}),
    "Validation error: \"name\" length must be at least 2 characters long"
)]
#[case(
    "/api/v1/employees",
    json!({"name": "Ada", "position": "Analyst", "department": "Engineering", "email": "ada@", "phone": "555"}),
    "Validation error: \"email\" must be a valid email, Branch ID is required"
)]
#[actix_web::test]
async fn invalid_payloads_are_rejected_before_storage(
    #[case] uri: &str,
    #[case] payload: Value,
    #[case] message: &str,
) {
    let app = init_app().await;
    let (status, body) = send(&app, TestRequest::post().uri(uri).set_json(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": message}));

    let (_, listed) = send(&app, TestRequest::get().uri(uri)).await;
    assert_eq!(listed["data"], json!([]));
}

#[actix_web::test]
async fn query_string_cannot_smuggle_an_invalid_body_into_storage() {
    let app = init_app().await;
    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/branches?phone=555-0100&name=Main")
            .set_json(json!({
                "name": "X",
                "address": "12 Market Street",
                "phone": "call me maybe!",
            })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().expect("error message");
    assert!(message.starts_with("Validation error: \"name\" length must be at least 2"));

    let (_, listed) = send(&app, TestRequest::get().uri("/api/v1/branches")).await;
    assert_eq!(listed["data"], json!([]));
}
