//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use scribe_core::domain::{Blog, BlogField, BlogPost, BlogPostField, User, UserField};

use super::entity::blog::{self, Entity as BlogEntity};
use super::entity::blog_post::{self, Entity as BlogPostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{Mapped, PostgresBaseRepository};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL blog repository.
pub type PostgresBlogRepository = PostgresBaseRepository<BlogEntity>;

/// PostgreSQL blog post repository.
pub type PostgresBlogPostRepository = PostgresBaseRepository<BlogPostEntity>;

#[async_trait]
impl Mapped for UserEntity {
    type Domain = User;

    fn column(field: UserField) -> user::Column {
        match field {
            UserField::Id => user::Column::Id,
            UserField::Email => user::Column::Email,
            UserField::Name => user::Column::Name,
            UserField::Role => user::Column::Role,
            UserField::CreatedAt => user::Column::CreatedAt,
            UserField::UpdatedAt => user::Column::UpdatedAt,
        }
    }

    fn deleted_at() -> user::Column {
        user::Column::DeletedAt
    }
}

#[async_trait]
impl Mapped for BlogEntity {
    type Domain = Blog;

    fn column(field: BlogField) -> blog::Column {
        match field {
            BlogField::Id => blog::Column::Id,
            BlogField::AuthorId => blog::Column::AuthorId,
            BlogField::Title => blog::Column::Title,
            BlogField::Description => blog::Column::Description,
            BlogField::CreatedAt => blog::Column::CreatedAt,
            BlogField::UpdatedAt => blog::Column::UpdatedAt,
        }
    }

    fn deleted_at() -> blog::Column {
        blog::Column::DeletedAt
    }
}

#[async_trait]
impl Mapped for BlogPostEntity {
    type Domain = BlogPost;

    fn column(field: BlogPostField) -> blog_post::Column {
        match field {
            BlogPostField::Id => blog_post::Column::Id,
            BlogPostField::BlogId => blog_post::Column::BlogId,
            BlogPostField::Title => blog_post::Column::Title,
            BlogPostField::Body => blog_post::Column::Body,
            BlogPostField::IsPublish => blog_post::Column::IsPublish,
            BlogPostField::Tags => blog_post::Column::Tags,
            BlogPostField::CreatedAt => blog_post::Column::CreatedAt,
            BlogPostField::UpdatedAt => blog_post::Column::UpdatedAt,
        }
    }

    fn deleted_at() -> blog_post::Column {
        blog_post::Column::DeletedAt
    }

    /// One batched query for all owning blogs. Soft-deleted blogs are still
    /// attached so ownership can be checked.
    async fn load_relations(db: &DbConn, mut posts: Vec<BlogPost>) -> Result<Vec<BlogPost>, DbErr> {
        let mut blog_ids: Vec<Uuid> = posts.iter().map(|p| p.blog_id).collect();
        blog_ids.sort_unstable();
        blog_ids.dedup();

        tracing::debug!(blogs = blog_ids.len(), "Loading blog relation for posts");

        let blogs: HashMap<Uuid, Blog> = BlogEntity::find()
            .filter(blog::Column::Id.is_in(blog_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, Blog::from(model)))
            .collect();

        for post in &mut posts {
            post.blog = blogs.get(&post.blog_id).cloned();
        }
        Ok(posts)
    }
}
