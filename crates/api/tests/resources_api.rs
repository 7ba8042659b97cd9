//! HTTP-level integration tests for the generic resource endpoints:
//! pagination, validation, relation round-trips, conflicts and
//! dependent-delete refusal.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, create_user, delete_auth, get, post_json, post_json_auth,
    put_json_auth,
};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_project(pool: &PgPool, token: &str, body: Value) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/projects", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn create_category(pool: &PgPool, token: &str, id: &str, name: &str) -> StatusCode {
    let app = common::build_test_app(pool.clone());
    let body = json!({"id": id, "name": name});
    post_json_auth(app, "/api/categories", body, token)
        .await
        .status()
}

fn sorted(values: &Value) -> Vec<String> {
    let mut out: Vec<String> = values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    out.sort();
    out
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_second_page_of_twelve(pool: PgPool) {
    let token = admin_token(&pool).await;
    for i in 0..12 {
        create_project(&pool, &token, json!({"title": format!("Project {i}")})).await;
    }

    let app = common::build_test_app(pool);
    let response = get(app, "/api/projects?page=2&limit=5").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(
        json["pagination"],
        json!({"page": 2, "limit": 5, "total": 12, "pages": 3})
    );
    assert_eq!(json["data"].as_array().unwrap().len(), 5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_out_of_range_limits_are_clamped(pool: PgPool) {
    let token = admin_token(&pool).await;
    create_project(&pool, &token, json!({"title": "Only"})).await;

    let json = body_json(get(common::build_test_app(pool.clone()), "/api/projects?limit=0").await).await;
    assert_eq!(json["pagination"]["limit"], 1);

    let json =
        body_json(get(common::build_test_app(pool.clone()), "/api/projects?limit=1000").await)
            .await;
    assert_eq!(json["pagination"]["limit"], 100);

    let json = body_json(get(common::build_test_app(pool), "/api/projects?page=-3").await).await;
    assert_eq!(json["pagination"]["page"], 1);
    assert_eq!(json["pagination"]["pages"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sort_and_filter(pool: PgPool) {
    let token = admin_token(&pool).await;
    create_project(&pool, &token, json!({"title": "Beta", "featured": true})).await;
    create_project(&pool, &token, json!({"title": "Alpha"})).await;
    create_project(&pool, &token, json!({"title": "Gamma", "featured": true})).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/projects?sort=title:asc").await).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/projects?featured=true&sort=title:desc").await).await;
    assert_eq!(json["pagination"]["total"], 2);
    assert_eq!(json["data"][0]["title"], "Gamma");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_blank_flag_filter_is_ignored(pool: PgPool) {
    let token = admin_token(&pool).await;
    create_project(&pool, &token, json!({"title": "Beta", "featured": true})).await;
    create_project(&pool, &token, json!({"title": "Alpha"})).await;

    let response = get(common::build_test_app(pool.clone()), "/api/projects?featured=").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["pagination"]["total"], 2);

    let response = get(common::build_test_app(pool), "/api/projects?featured=maybe").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_missing_title_names_field(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/projects", json!({"summary": "no title"}), &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["errors"][0]["field"], "title");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_empty_update_is_rejected(pool: PgPool) {
    let token = admin_token(&pool).await;
    let project = create_project(&pool, &token, json!({"title": "Solo"})).await;
    let uri = format!("/api/projects/{}", project["id"]);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "At least one field must be provided for update"
    );

    let app = common::build_test_app(pool);
    let response = put_json_auth(app, &uri, json!({"title": null}), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_unknown_field_is_rejected(pool: PgPool) {
    let token = admin_token(&pool).await;
    let project = create_project(&pool, &token, json!({"title": "Solo"})).await;
    let uri = format!("/api/projects/{}", project["id"]);

    let app = common::build_test_app(pool);
    let response = put_json_auth(app, &uri, json!({"titel": "typo"}), &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_reserved_category_id_is_rejected(pool: PgPool) {
    let token = admin_token(&pool).await;

    for body in [json!({"name": "Recount"}), json!({"id": "recount", "name": "Totals"})] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/categories", body, &token).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["errors"][0]["field"], "id");
    }

    let json = body_json(get(common::build_test_app(pool), "/api/categories").await).await;
    assert_eq!(json["pagination"]["total"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_slug_that_cannot_be_derived_names_field(pool: PgPool) {
    let token = admin_token(&pool).await;

    let cases = [
        ("/api/projects", json!({"title": "日本語"}), "slug"),
        ("/api/categories", json!({"name": "デザイン"}), "id"),
        ("/api/blogs/posts", json!({"title": "!!!", "content": "Body"}), "slug"),
        ("/api/blogs/categories", json!({"name": "???"}), "slug"),
    ];
    for (uri, body, field) in cases {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, uri, body, &token).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR", "{uri}");
        assert_eq!(json["errors"][0]["field"], field, "{uri}");
        assert!(!json["message"].as_str().unwrap().contains("check"), "{uri}");
    }

    let project = create_project(&pool, &token, json!({"title": "日本語", "slug": "nihongo"})).await;
    assert_eq!(project["slug"], "nihongo");
}

// ---------------------------------------------------------------------------
// Relations and read stability
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_technologies_round_trip_as_flat_array(pool: PgPool) {
    let token = admin_token(&pool).await;
    let project = create_project(
        &pool,
        &token,
        json!({
            "title": "Folio",
            "technologies": ["React", "Go"],
            "features": ["Search"],
            "images": ["https://cdn.example.com/a.png"]
        }),
    )
    .await;
    assert_eq!(sorted(&project["technologies"]), vec!["Go", "React"]);

    let uri = format!("/api/projects/{}", project["id"]);
    let first = body_json(get(common::build_test_app(pool.clone()), &uri).await).await;
    let second = body_json(get(common::build_test_app(pool.clone()), &uri).await).await;

    assert_eq!(first, second, "repeated reads must be identical");
    assert_eq!(sorted(&first["data"]["technologies"]), vec!["Go", "React"]);
    assert_eq!(first["data"]["features"], json!(["Search"]));
    assert_eq!(first["data"]["images"], json!(["https://cdn.example.com/a.png"]));

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({"technologies": ["Rust"]}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["technologies"], json!(["Rust"]));
    assert_eq!(json["data"]["features"], json!(["Search"]));
    assert_eq!(json["message"], "Project updated successfully");

    let slug = json["data"]["slug"].as_str().unwrap().to_string();
    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/projects/slug/{slug}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], project["id"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_project_is_404(pool: PgPool) {
    let token = admin_token(&pool).await;

    let response = get(common::build_test_app(pool.clone()), "/api/projects/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        "Project with id 999999 not found"
    );

    let app = common::build_test_app(pool);
    let response = delete_auth(app, "/api/projects/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_admin_cannot_create_project(pool: PgPool) {
    let (_, editor) = create_user(&pool, "editor@folio.test", "editor").await;
    let (_, viewer) = create_user(&pool, "viewer@folio.test", "viewer").await;

    let body = json!({"title": "Nope"});
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/projects", body.clone(), &editor)
            .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["message"], "Admin role required");

    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/projects", body.clone(), &viewer)
            .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(common::build_test_app(pool), "/api/projects", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_editor_writes_blog_posts(pool: PgPool) {
    let (editor, token) = create_user(&pool, "writer@folio.test", "editor").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({
        "title": "Hello World",
        "content": "First post",
        "status": "published",
        "tags": ["rust", "Rust", "axum"]
    });
    let response = post_json_auth(app, "/api/blogs/posts", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["author_id"], editor.id);
    assert_eq!(json["data"]["slug"], "hello-world");
    assert!(json["data"]["published_at"].is_string());
    assert_eq!(sorted(&json["data"]["tags"]).len(), 2);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/blogs/posts/slug/hello-world").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["title"], "Hello World");
}

// ---------------------------------------------------------------------------
// Conflicts and dependents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_category_id_is_409(pool: PgPool) {
    let token = admin_token(&pool).await;

    assert_eq!(
        create_category(&pool, &token, "web", "Web").await,
        StatusCode::CREATED
    );
    assert_eq!(
        create_category(&pool, &token, "web", "Web Apps").await,
        StatusCode::CONFLICT
    );
    // Names are unique case-insensitively as well.
    assert_eq!(
        create_category(&pool, &token, "web-2", "WEB").await,
        StatusCode::CONFLICT
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_category_with_projects_cannot_be_deleted(pool: PgPool) {
    let token = admin_token(&pool).await;
    create_category(&pool, &token, "web", "Web").await;
    create_project(&pool, &token, json!({"title": "Site", "category_id": "web"})).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, "/api/categories/web", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Cannot delete category with existing projects");
    assert_eq!(json["projectCount"], 1);

    let response = get(common::build_test_app(pool.clone()), "/api/categories/web").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["count"], 1);

    let response = delete_auth(common::build_test_app(pool.clone()), "/api/categories/web", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_category_reference_is_400(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({"title": "Orphan", "category_id": "nowhere"});
    let response = post_json_auth(app, "/api/projects", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_REFERENCE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_recount_repairs_counts(pool: PgPool) {
    let token = admin_token(&pool).await;
    create_category(&pool, &token, "web", "Web").await;
    create_project(&pool, &token, json!({"title": "Site", "category_id": "web"})).await;
    sqlx::query("UPDATE categories SET count = 9 WHERE id = 'web'")
        .execute(&pool)
        .await
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/categories/recount", json!({}), &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["updated"], 1);

    let json = body_json(get(common::build_test_app(pool), "/api/categories/web").await).await;
    assert_eq!(json["data"]["count"], 1);
}

// ---------------------------------------------------------------------------
// Site content
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_active_hero(pool: PgPool) {
    let token = admin_token(&pool).await;

    let response = get(common::build_test_app(pool.clone()), "/api/hero/active").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let body = json!({"title": "Welcome", "is_active": true});
    let response = post_json_auth(app, "/api/hero/sections", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(common::build_test_app(pool), "/api/hero/active").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["title"], "Welcome");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_contact_submission_is_public_but_listing_is_not(pool: PgPool) {
    let token = admin_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let body = json!({"name": "Ann", "email": "ann@example.com", "message": "Hi there"});
    let response = post_json(app, "/api/contacts", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let contact = body_json(response).await["data"].clone();
    assert_eq!(contact["status"], "new");

    let response = get(common::build_test_app(pool.clone()), "/api/contacts").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/contacts/{}", contact["id"]);
    let response = put_json_auth(app, &uri, json!({"status": "read"}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "read");

    let app = common::build_test_app(pool);
    let response = put_json_auth(app, &uri, json!({"status": "archived"}), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_returns_message_only(pool: PgPool) {
    let token = admin_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let body = json!({"name": "Acme"});
    let response = post_json_auth(app, "/api/clients", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].clone();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/clients/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"success": true, "message": "Client deleted successfully"})
    );

    let response = get(common::build_test_app(pool), &format!("/api/clients/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
