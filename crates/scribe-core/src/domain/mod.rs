//! Domain entities - the core business objects.

mod blog;
mod blog_post;
mod user;

pub use blog::{Blog, BlogField};
pub use blog_post::{BlogPost, BlogPostField, normalize_tags};
pub use user::{Role, User, UserField};
