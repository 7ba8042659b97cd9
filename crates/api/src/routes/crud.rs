use axum::routing::get;
use axum::Router;

use crate::handlers::crud::{self, CrudResource};
use crate::state::AppState;

/// Standard routes for one resource.
///
/// ```text
/// GET    /       list (paged, sorted, filtered)
/// POST   /       create
/// GET    /{id}   get
/// PUT    /{id}   update (partial)
/// DELETE /{id}   delete
/// ```
pub fn crud_router<R: CrudResource>() -> Router<AppState> {
    Router::new()
        .route("/", get(crud::list::<R>).post(crud::create::<R>))
        .route(
            "/{id}",
            get(crud::get::<R>)
                .put(crud::update::<R>)
                .delete(crud::delete::<R>),
        )
}
