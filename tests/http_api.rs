//! Integration tests for the entitlement HTTP API.
//!
//! These tests send requests through the complete router (context
//! middleware, tower-http layers, handlers) backed by in-memory adapters.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use course_entitlements::adapters::http::{api_router, EntitlementAppState};
use course_entitlements::adapters::{InMemoryDirectory, InMemoryEntitlementStore, InMemoryEventBus};
use course_entitlements::application::UserContextResolver;
use course_entitlements::config::ServerConfig;
use course_entitlements::domain::entitlement::Role;
use course_entitlements::domain::foundation::{ClassId, ProfileId, SchoolId, UserId};
use course_entitlements::ports::DirectoryEntry;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn entry(role: Role, school: Option<&str>, profile: Option<&str>) -> DirectoryEntry {
    DirectoryEntry {
        role,
        school_id: school.map(|s| SchoolId::new(s).unwrap()),
        profile_id: profile.map(|p| ProfileId::new(p).unwrap()),
        class_id: None,
    }
}

fn app() -> Router {
    let directory = InMemoryDirectory::new()
        .with_user(UserId::new("root").unwrap(), entry(Role::Superadmin, None, None))
        .with_user(UserId::new("admin-1").unwrap(), entry(Role::Admin, Some("s-1"), None))
        .with_user(
            UserId::new("stu-1").unwrap(),
            entry(Role::Student, Some("s-1"), Some("p-stu-1")),
        )
        .with_user(
            UserId::new("stu-2").unwrap(),
            entry(Role::Student, Some("s-1"), Some("p-stu-2")),
        )
        .with_user(
            UserId::new("tea-1").unwrap(),
            entry(Role::Teacher, Some("s-1"), Some("p-tea-1")),
        )
        .with_student_class(ProfileId::new("p-stu-1").unwrap(), ClassId::new("7B").unwrap());
    let directory = Arc::new(directory);
    let store = Arc::new(InMemoryEntitlementStore::new());

    let state = EntitlementAppState {
        courses: store.clone(),
        availability: store.clone(),
        ledger: store.clone(),
        vault: store,
        schools: directory.clone(),
        event_publisher: Arc::new(InMemoryEventBus::new()),
        resolver: Arc::new(UserContextResolver::new(directory.clone(), directory)),
    };

    api_router(state, &ServerConfig::default())
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_course(app: &Router, body: Value) -> String {
    let (status, json) = call(app, Method::POST, "/api/courses", Some("root"), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["id"].as_str().unwrap().to_string()
}

async fn assign(app: &Router, course_id: &str, schools: Value) -> Value {
    let (status, json) = call(
        app,
        Method::PUT,
        &format!("/api/courses/{course_id}/schools"),
        Some("root"),
        Some(json!({ "school_ids": schools })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    json
}

fn paid_course(cap: u32) -> Value {
    json!({
        "title": "Chemistry",
        "pricing": { "kind": "paid", "plan": "annual", "price_cents": 12000 },
        "max_users_allowed": cap
    })
}

fn free_course() -> Value {
    json!({ "title": "Reading", "pricing": { "kind": "free" } })
}

// =============================================================================
// Plumbing
// =============================================================================

#[tokio::test]
async fn health_needs_no_identity() {
    let (status, json) = call(&app(), Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn catalog_requires_identity() {
    let (status, json) = call(&app(), Method::GET, "/api/courses", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn unknown_identity_is_unauthorized() {
    let (status, _) = call(&app(), Method::GET, "/api/courses", Some("nobody"), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_course_id_is_bad_request() {
    let (status, json) = call(
        &app(),
        Method::GET,
        "/api/courses/not-a-uuid",
        Some("stu-1"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_FAILED");
}

// =============================================================================
// Catalog Management
// =============================================================================

#[tokio::test]
async fn only_superadmins_create_courses() {
    let (status, _) = call(
        &app(),
        Method::POST,
        "/api/courses",
        Some("admin-1"),
        Some(free_course()),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn assignment_to_unknown_school_is_not_found() {
    let app = app();
    let course_id = create_course(&app, free_course()).await;

    let (status, json) = call(
        &app,
        Method::PUT,
        &format!("/api/courses/{course_id}/schools"),
        Some("root"),
        Some(json!({ "school_ids": ["s-404"] })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "SCHOOL_NOT_FOUND");
}

#[tokio::test]
async fn admin_retargets_assignment_for_a_class() {
    let app = app();
    let course_id = create_course(&app, free_course()).await;
    assign(&app, &course_id, json!(["s-1"])).await;

    let (status, json) = call(
        &app,
        Method::PUT,
        &format!("/api/courses/{course_id}/schools/s-1"),
        Some("admin-1"),
        Some(json!({ "audience": "student", "target_class_id": "7B" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["target_class_id"], "7B");

    let (_, placed) = call(&app, Method::GET, "/api/courses", Some("stu-1"), None).await;
    let (_, unplaced) = call(&app, Method::GET, "/api/courses", Some("stu-2"), None).await;
    let (_, teacher) = call(&app, Method::GET, "/api/courses", Some("tea-1"), None).await;

    assert_eq!(placed["courses"].as_array().unwrap().len(), 1);
    assert!(unplaced["courses"].as_array().unwrap().is_empty());
    assert!(teacher["courses"].as_array().unwrap().is_empty());
}

// =============================================================================
// Enrollment
// =============================================================================

#[tokio::test]
async fn free_enrollment_round_trip() {
    let app = app();
    let course_id = create_course(&app, free_course()).await;
    assign(&app, &course_id, json!(["s-1"])).await;
    let path = format!("/api/courses/{course_id}/enrollment");

    let (status, json) = call(&app, Method::POST, &path, Some("stu-1"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["already_enrolled"], false);

    let (status, json) = call(&app, Method::POST, &path, Some("stu-1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["already_enrolled"], true);

    let (_, view) = call(
        &app,
        Method::GET,
        &format!("/api/courses/{course_id}"),
        Some("stu-1"),
        None,
    )
    .await;
    assert_eq!(view["is_enrolled"], true);

    let (status, _) = call(&app, Method::DELETE, &path, Some("stu-1"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn paid_course_requires_payment() {
    let app = app();
    let course_id = create_course(&app, paid_course(10)).await;
    assign(&app, &course_id, json!(["s-1"])).await;

    let (status, json) = call(
        &app,
        Method::POST,
        &format!("/api/courses/{course_id}/enrollment"),
        Some("stu-1"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(json["code"], "COURSE_NOT_FREE");
}

// =============================================================================
// Activation Codes
// =============================================================================

#[tokio::test]
async fn single_seat_code_is_exhausted_after_one_redemption() {
    let app = app();
    let course_id = create_course(&app, paid_course(1)).await;
    assign(&app, &course_id, json!(["s-1"])).await;

    let (status, code) = call(
        &app,
        Method::POST,
        &format!("/api/courses/{course_id}/codes"),
        Some("root"),
        Some(json!({ "code": "ABCD-1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{code}");
    assert_eq!(code["remaining"], 1);

    let redemptions = format!("/api/courses/{course_id}/redemptions");
    let (first, _) = call(
        &app,
        Method::POST,
        &redemptions,
        Some("stu-1"),
        Some(json!({ "code": "abcd-1234" })),
    )
    .await;
    let (second, json) = call(
        &app,
        Method::POST,
        &redemptions,
        Some("stu-2"),
        Some(json!({ "code": "ABCD-1234" })),
    )
    .await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ACTIVATION_CODE_EXHAUSTED");

    let (status, audit) = call(
        &app,
        Method::GET,
        &format!("/api/courses/{course_id}/enrollments"),
        Some("root"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audit["enrollments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let app = app();
    let course_id = create_course(&app, paid_course(5)).await;

    let (status, json) = call(
        &app,
        Method::POST,
        &format!("/api/courses/{course_id}/redemptions"),
        Some("stu-1"),
        Some(json!({ "code": "ZZZZ-9999" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "ACTIVATION_CODE_NOT_FOUND");
}
