//! HTTP-level tests for media deletion against an in-process store.

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{admin_token, body_json, create_user, delete_auth};
use folio_api::media::{MediaDeletion, MediaError, MediaStore};
use sqlx::PgPool;

/// Answers every delete with a fixed outcome and records the ids asked for.
struct FakeStore {
    outcome: MediaDeletion,
    seen: Mutex<Vec<String>>,
}

impl FakeStore {
    fn new(outcome: MediaDeletion) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl MediaStore for FakeStore {
    async fn delete(&self, public_id: &str) -> Result<MediaDeletion, MediaError> {
        self.seen.lock().unwrap().push(public_id.to_string());
        Ok(self.outcome.clone())
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_passes_nested_public_id(pool: PgPool) {
    let token = admin_token(&pool).await;
    let store = FakeStore::new(MediaDeletion::Deleted);
    let app = common::build_test_app_with_media(pool, store.clone());

    let response = delete_auth(app, "/api/media/portfolio/covers/hero-1", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Media deleted successfully"
    );
    assert_eq!(*store.seen.lock().unwrap(), vec!["portfolio/covers/hero-1"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_asset_is_404(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app_with_media(pool, FakeStore::new(MediaDeletion::NotFound));

    let response = delete_auth(app, "/api/media/nope", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_other_provider_result_is_502(pool: PgPool) {
    let token = admin_token(&pool).await;
    let store = FakeStore::new(MediaDeletion::Other("error".into()));
    let app = common::build_test_app_with_media(pool, store);

    let response = delete_auth(app, "/api/media/x", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "MEDIA_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unconfigured_media_is_400(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = delete_auth(app, "/api/media/x", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Media storage is not configured"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_media_delete_requires_admin(pool: PgPool) {
    let (_, editor) = create_user(&pool, "ed@folio.test", "editor").await;
    let app = common::build_test_app_with_media(pool, FakeStore::new(MediaDeletion::Deleted));

    let response = delete_auth(app, "/api/media/x", &editor).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
