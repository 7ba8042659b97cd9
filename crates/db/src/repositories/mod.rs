//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async data-access
//! methods that accept `&PgPool` as the first argument. Structurally uniform
//! resources implement [`Resource`]; the rest expose inherent methods only.

mod relations;

pub mod about_repo;
pub mod blog_category_repo;
pub mod blog_post_repo;
pub mod blog_tag_repo;
pub mod category_repo;
pub mod client_repo;
pub mod contact_repo;
pub mod hero_section_repo;
pub mod project_repo;
pub mod resource;
pub mod service_repo;
pub mod statistic_repo;
pub mod team_member_repo;
pub mod technology_repo;
pub mod testimonial_repo;
pub mod user_repo;

pub use about_repo::{AboutSectionRepo, MilestoneRepo};
pub use blog_category_repo::BlogCategoryRepo;
pub use blog_post_repo::BlogPostRepo;
pub use blog_tag_repo::BlogTagRepo;
pub use category_repo::CategoryRepo;
pub use client_repo::ClientRepo;
pub use contact_repo::ContactRepo;
pub use hero_section_repo::HeroSectionRepo;
pub use project_repo::ProjectRepo;
pub use resource::{Dependents, Resource};
pub use service_repo::ServiceRepo;
pub use statistic_repo::StatisticRepo;
pub use team_member_repo::TeamMemberRepo;
pub use technology_repo::TechnologyRepo;
pub use testimonial_repo::TestimonialRepo;
pub use user_repo::UserRepo;
