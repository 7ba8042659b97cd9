//! HTTP-level integration tests for login, the current-user endpoints,
//! admin user management and per-user rate limiting.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, StatusCode};
use common::{
    body_json, create_user, delete_auth, get_auth, post_json, post_json_auth, put_json_auth,
    TEST_PASSWORD,
};
use folio_core::rate_limit::{InMemoryRateLimitStore, RateLimiter};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns a token that works on authenticated routes.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let (user, _) = create_user(&pool, "ada@folio.test", "editor").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({"email": "  ADA@folio.test ", "password": TEST_PASSWORD});
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["token"].is_string());
    assert_eq!(json["data"]["expires_in"], 3600);
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert_eq!(json["data"]["user"]["role"], "editor");
    assert!(json["data"]["user"].get("password_hash").is_none());

    let token = json["data"]["token"].as_str().unwrap().to_string();
    let response = get_auth(common::build_test_app(pool), "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["email"], "ada@folio.test");
}

/// Wrong password and unknown email answer the same 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_user(&pool, "ada@folio.test", "viewer").await;

    let body = json!({"email": "ada@folio.test", "password": "not-the-password"});
    let response = post_json(common::build_test_app(pool.clone()), "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(response).await;

    let body = json!({"email": "nobody@folio.test", "password": "whatever"});
    let response = post_json(common::build_test_app(pool), "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(body_json(response).await["message"], wrong_password["message"]);
}

/// Deactivated accounts cannot log in, and their existing tokens stop working.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_deactivated_user(pool: PgPool) {
    let (user, token) = create_user(&pool, "gone@folio.test", "editor").await;
    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let body = json!({"email": "gone@folio.test", "password": TEST_PASSWORD});
    let response = post_json(common::build_test_app(pool.clone()), "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(common::build_test_app(pool), "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Account is deactivated");
}

/// Role changes apply to existing tokens because the row is re-read.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_role_is_read_from_database(pool: PgPool) {
    let (user, token) = create_user(&pool, "promoted@folio.test", "viewer").await;
    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let response = get_auth(common::build_test_app(pool), "/api/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_change_password(pool: PgPool) {
    let (_, token) = create_user(&pool, "ada@folio.test", "viewer").await;

    let body = json!({"current_password": "wrong", "new_password": "brand-new-pass"});
    let response =
        put_json_auth(common::build_test_app(pool.clone()), "/api/auth/password", body, &token)
            .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({"current_password": TEST_PASSWORD, "new_password": "short"});
    let response =
        put_json_auth(common::build_test_app(pool.clone()), "/api/auth/password", body, &token)
            .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errors"][0]["field"], "new_password");

    let body = json!({"current_password": TEST_PASSWORD, "new_password": "brand-new-pass"});
    let response =
        put_json_auth(common::build_test_app(pool.clone()), "/api/auth/password", body, &token)
            .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json!({"email": "ada@folio.test", "password": "brand-new-pass"});
    let response = post_json(common::build_test_app(pool), "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// User management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_manages_users(pool: PgPool) {
    let (admin, token) = create_user(&pool, "root@folio.test", "admin").await;

    let body = json!({
        "email": "New@Folio.test",
        "name": "Newcomer",
        "password": "initial-password",
        "role": "editor"
    });
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await["data"].clone();
    assert_eq!(created["email"], "new@folio.test");

    let response =
        get_auth(common::build_test_app(pool.clone()), "/api/users?role=editor", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["pagination"]["total"], 1);

    let uri = format!("/api/users/{}", created["id"]);
    let body = json!({"role": "superuser"});
    let response =
        put_json_auth(common::build_test_app(pool.clone()), &uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/users/{}", admin.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "You cannot delete your own account"
    );

    let response = delete_auth(common::build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_email_is_409(pool: PgPool) {
    let (_, token) = create_user(&pool, "root@folio.test", "admin").await;

    let body = json!({"email": "ROOT@folio.test", "name": "Dup", "password": "long-enough"});
    let response = post_json_auth(common::build_test_app(pool), "/api/users", body, &token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_editor_cannot_manage_users(pool: PgPool) {
    let (_, token) = create_user(&pool, "ed@folio.test", "editor").await;

    let response = get_auth(common::build_test_app(pool), "/api/users", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_rate_limit_is_per_user(pool: PgPool) {
    let (_, first) = create_user(&pool, "one@folio.test", "viewer").await;
    let (_, second) = create_user(&pool, "two@folio.test", "viewer").await;
    let limiter = RateLimiter::new(
        Arc::new(InMemoryRateLimitStore::new()),
        2,
        Duration::from_secs(60),
    );

    for _ in 0..2 {
        let app = common::build_test_app_with_limiter(pool.clone(), limiter.clone());
        let response = get_auth(app, "/api/auth/me", &first).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let app = common::build_test_app_with_limiter(pool.clone(), limiter.clone());
    let response = get_auth(app, "/api/auth/me", &first).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    let json = body_json(response).await;
    assert_eq!(json["code"], "RATE_LIMITED");
    assert!(json["retryAfter"].as_u64().unwrap() >= 1);

    let app = common::build_test_app_with_limiter(pool, limiter);
    let response = get_auth(app, "/api/auth/me", &second).await;
    assert_eq!(response.status(), StatusCode::OK);
}
