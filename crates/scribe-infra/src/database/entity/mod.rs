//! SeaORM entities mirroring the domain model.

pub mod blog;
pub mod blog_post;
pub mod user;
