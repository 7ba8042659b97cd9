//! Rejections that happen before any query runs: authentication, body
//! parsing, validation and path parsing.
//!
//! The app is built over a lazily-connected pool pointing at nothing, so any
//! accidental database access would surface as a 500.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, lazy_pool, post_json, post_json_auth, post_raw};
use folio_api::auth::jwt::Claims;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

fn signed(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn claims(exp_offset_secs: i64) -> Claims {
    let now = chrono::Utc::now().timestamp();
    Claims {
        sub: 1,
        email: "admin@folio.test".into(),
        role: "admin".into(),
        exp: now + exp_offset_secs,
        iat: now - 3600,
        jti: "test".into(),
    }
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_is_401() {
    let app = common::build_test_app(lazy_pool());

    let response = post_json(app, "/api/projects", json!({"title": "X"})).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["message"], "Authentication required");
}

#[tokio::test]
async fn non_bearer_scheme_is_401() {
    let app = common::build_test_app(lazy_pool());

    let request = axum::http::Request::builder()
        .uri("/api/users")
        .header("authorization", "Basic YWRtaW46YWRtaW4=")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "Invalid Authorization format. Expected: Bearer <token>"
    );
}

#[tokio::test]
async fn expired_token_is_distinguished_from_invalid() {
    let expired = signed(&claims(-600), common::TEST_SECRET);
    let forged = signed(&claims(600), "some-other-secret");

    let response = get_auth(common::build_test_app(lazy_pool()), "/api/users", &expired).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Token has expired");

    let response = get_auth(common::build_test_app(lazy_pool()), "/api/users", &forged).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid token");

    let response =
        get_auth(common::build_test_app(lazy_pool()), "/api/users", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid token");
}

#[tokio::test]
async fn expired_token_is_rejected_on_staff_routes_too() {
    let expired = signed(&claims(-600), common::TEST_SECRET);
    let app = common::build_test_app(lazy_pool());

    let response =
        post_json_auth(app, "/api/blogs/posts", json!({"title": "Hello"}), &expired).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Body validation on a public endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_required_fields_are_named() {
    let app = common::build_test_app(lazy_pool());

    let response = post_json(app, "/api/contacts", json!({"subject": "Hi"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "message", "name"]);
    assert_eq!(json["errors"][2]["message"], "name is required");
}

#[tokio::test]
async fn whitespace_only_values_fail_after_trimming() {
    let app = common::build_test_app(lazy_pool());

    let body = json!({"name": "   ", "email": "ann@example.com", "message": "Hello"});
    let response = post_json(app, "/api/contacts", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "name");
}

#[tokio::test]
async fn invalid_email_is_reported() {
    let app = common::build_test_app(lazy_pool());

    let body = json!({"name": "Ann", "email": "not-an-email", "message": "Hello"});
    let response = post_json(app, "/api/contacts", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "email");
    assert_eq!(json["errors"][0]["message"], "email must be a valid email address");
}

#[tokio::test]
async fn malformed_json_is_400_not_422() {
    let app = common::build_test_app(lazy_pool());

    let response = post_raw(app, "/api/contacts", "{\"name\": ").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn wrong_field_type_is_400() {
    let app = common::build_test_app(lazy_pool());

    let body = json!({"name": 12, "email": "ann@example.com", "message": "Hello"});
    let response = post_json(app, "/api/contacts", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn non_object_body_is_400() {
    let app = common::build_test_app(lazy_pool());

    let response = post_raw(app, "/api/contacts", "[1, 2]").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Request body must be a JSON object"
    );
}

// ---------------------------------------------------------------------------
// Path parsing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_numeric_id_is_400() {
    let app = common::build_test_app(lazy_pool());

    let response = get(app, "/api/projects/not-a-number").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Health and middleware
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = common::build_test_app(lazy_pool());

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
