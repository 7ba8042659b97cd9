pub mod auth;
pub mod crud;
pub mod health;
pub mod users;

use axum::routing::{delete, get, post};
use axum::Router;
use folio_db::repositories::{
    AboutSectionRepo, BlogCategoryRepo, BlogPostRepo, BlogTagRepo, CategoryRepo, ClientRepo,
    ContactRepo, HeroSectionRepo, MilestoneRepo, ProjectRepo, ServiceRepo, StatisticRepo,
    TeamMemberRepo, TechnologyRepo, TestimonialRepo,
};

use crate::handlers;
use crate::state::AppState;
use crud::crud_router;

/// Build the `/api` route tree.
///
/// Route hierarchy (every resource also has `/{id}` for get/update/delete):
///
/// ```text
/// /auth/login, /auth/me, /auth/password
/// /users                                admin only
///
/// /projects                             read public, write admin
/// /projects/slug/{slug}                 public lookup
/// /categories                           read public, write admin
/// /categories/recount                   recompute project counts (admin)
/// /technologies                         read public, write admin
///
/// /blogs/posts                          read public, write staff
/// /blogs/posts/slug/{slug}              public lookup
/// /blogs/categories                     read public, write staff
/// /blogs/tags                           read public, write staff
///
/// /team-members, /testimonials, /clients, /services, /statistics
/// /hero/sections, /hero/active
/// /about/sections, /about/milestones
///
/// /contacts                             submit public, manage admin
/// /media/{*public_id}                   DELETE (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest(
            "/projects",
            crud_router::<ProjectRepo>()
                .route("/slug/{slug}", get(handlers::projects::get_by_slug)),
        )
        .nest(
            "/categories",
            crud_router::<CategoryRepo>()
                .route("/recount", post(handlers::categories::recount)),
        )
        .nest("/technologies", crud_router::<TechnologyRepo>())
        .nest("/blogs", blog_routes())
        .nest("/team-members", crud_router::<TeamMemberRepo>())
        .nest("/testimonials", crud_router::<TestimonialRepo>())
        .nest("/clients", crud_router::<ClientRepo>())
        .nest("/services", crud_router::<ServiceRepo>())
        .nest("/statistics", crud_router::<StatisticRepo>())
        .nest(
            "/hero",
            Router::new()
                .nest("/sections", crud_router::<HeroSectionRepo>())
                .route("/active", get(handlers::hero::get_active)),
        )
        .nest(
            "/about",
            Router::new()
                .nest("/sections", crud_router::<AboutSectionRepo>())
                .nest("/milestones", crud_router::<MilestoneRepo>()),
        )
        .nest("/contacts", crud_router::<ContactRepo>())
        .route("/media/{*public_id}", delete(handlers::media::delete_media))
}

fn blog_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/posts",
            crud_router::<BlogPostRepo>()
                .route("/slug/{slug}", get(handlers::blog::get_post_by_slug)),
        )
        .nest("/categories", crud_router::<BlogCategoryRepo>())
        .nest("/tags", crud_router::<BlogTagRepo>())
}
