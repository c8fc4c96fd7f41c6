use async_graphql::dataloader::DataLoader;
use async_graphql::{Context, InputObject, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use scribe_core::domain::Blog;
use scribe_core::services::{BlogService, CreateBlogRequest, UpdateBlogRequest};

use super::blog_post::BlogPostObject;
use super::gate::Gate;
use super::loaders::AuthorLoader;
use super::types::BlogListOptions;
use super::user::UserObject;
use crate::middleware::error::{AppError, GraphqlResultExt};

pub struct BlogObject(pub Blog);

#[Object(name = "Blog")]
impl BlogObject {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    async fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.0.deleted_at
    }

    /// Fetched only when selected; lookups are batched per request.
    async fn author(&self, ctx: &Context<'_>) -> Result<UserObject> {
        let loader = ctx.data_unchecked::<DataLoader<AuthorLoader>>();
        let author = loader
            .load_one(self.0.author_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
            .gql()?;

        author
            .map(UserObject)
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", self.0.author_id)))
            .gql()
    }
}

#[derive(InputObject)]
pub struct CreateBlogInput {
    pub title: String,
    pub description: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateBlogInput {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(SimpleObject)]
pub struct BlogsResponse {
    pub results: Vec<BlogObject>,
    pub total: u64,
    pub options: BlogListOptions,
}

#[derive(Default)]
pub struct BlogQueries;

#[Object]
impl BlogQueries {
    async fn get_blog_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<BlogObject> {
        Gate::admit(ctx, "getBlogById").await.gql()?;
        let blogs = ctx.data_unchecked::<BlogService>();

        blogs.get_blog(id).await.map(BlogObject).gql()
    }

    async fn blogs(
        &self,
        ctx: &Context<'_>,
        filter: Option<BlogListOptions>,
    ) -> Result<BlogsResponse> {
        Gate::admit(ctx, "blogs").await.gql()?;
        let blogs = ctx.data_unchecked::<BlogService>();

        let options = filter.unwrap_or_default();
        let response = blogs.get_blogs(options.clone().into()).await.gql()?;

        Ok(BlogsResponse {
            results: response.results.into_iter().map(BlogObject).collect(),
            total: response.total,
            options,
        })
    }

    /// Posts of one blog.
    async fn get_blog_posts(&self, ctx: &Context<'_>, id: Uuid) -> Result<Vec<BlogPostObject>> {
        Gate::admit(ctx, "getBlogPosts").await.gql()?;
        let blogs = ctx.data_unchecked::<BlogService>();

        let posts = blogs.find_related_posts(id).await.gql()?;
        Ok(posts.into_iter().map(BlogPostObject).collect())
    }
}

#[derive(Default)]
pub struct BlogMutations;

#[Object]
impl BlogMutations {
    async fn create_blog(
        &self,
        ctx: &Context<'_>,
        create_blog_input: CreateBlogInput,
    ) -> Result<BlogObject> {
        let user = Gate::user(ctx, "createBlog").await.gql()?;
        let blogs = ctx.data_unchecked::<BlogService>();

        let request = CreateBlogRequest {
            title: create_blog_input.title,
            description: create_blog_input.description,
        };
        blogs.create_blog(&user, request).await.map(BlogObject).gql()
    }

    async fn update_blog(
        &self,
        ctx: &Context<'_>,
        update_blog_input: UpdateBlogInput,
    ) -> Result<BlogObject> {
        let user = Gate::user(ctx, "updateBlog").await.gql()?;
        let blogs = ctx.data_unchecked::<BlogService>();

        let request = UpdateBlogRequest {
            id: update_blog_input.id,
            title: update_blog_input.title,
            description: update_blog_input.description,
        };
        blogs.update_blog(&user, request).await.map(BlogObject).gql()
    }

    /// Soft delete. `false` when there was nothing to delete.
    async fn delete_blog(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let user = Gate::user(ctx, "deleteBlog").await.gql()?;
        let blogs = ctx.data_unchecked::<BlogService>();

        blogs.delete_blog(&user, id).await.gql()
    }
}
