pub mod auth;
pub mod blog;
pub mod categories;
pub mod crud;
pub mod hero;
pub mod media;
pub mod projects;
pub mod users;
