use async_graphql::{Context, InputObject, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use scribe_core::domain::BlogPost;
use scribe_core::services::{BlogPostService, CreateBlogPostRequest, UpdateBlogPostRequest};

use super::blog::BlogObject;
use super::gate::Gate;
use super::types::PostListOptions;
use crate::middleware::error::GraphqlResultExt;

pub struct BlogPostObject(pub BlogPost);

#[Object(name = "BlogPost")]
impl BlogPostObject {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn blog_id(&self) -> Uuid {
        self.0.blog_id
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn body(&self) -> &str {
        &self.0.body
    }

    async fn is_publish(&self) -> bool {
        self.0.is_publish
    }

    async fn tags(&self) -> &[String] {
        &self.0.tags
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

    /// Owning blog: the loaded relation when present, otherwise fetched.
    async fn blog(&self, ctx: &Context<'_>) -> Result<BlogObject> {
        if let Some(blog) = &self.0.blog {
            return Ok(BlogObject(blog.clone()));
        }
        let posts = ctx.data_unchecked::<BlogPostService>();
        posts.get_main_blog(self.0.blog_id).await.map(BlogObject).gql()
    }
}

#[derive(InputObject)]
pub struct CreateBlogPostInput {
    pub blog_id: Uuid,
    pub title: String,
    pub body: String,
    #[graphql(default)]
    pub is_publish: bool,
    #[graphql(default)]
    pub tags: Vec<String>,
}

#[derive(InputObject)]
pub struct UpdateBlogPostInput {
    pub id: Uuid,
    pub title: Option<String>,
    pub body: Option<String>,
    pub is_publish: Option<bool>,
    pub tags: Option<Vec<String>>,
}

#[derive(SimpleObject)]
pub struct BlogPostsResponse {
    pub results: Vec<BlogPostObject>,
    pub total: u64,
    pub options: PostListOptions,
}

#[derive(Default)]
pub struct BlogPostQueries;

#[Object]
impl BlogPostQueries {
    async fn get_post(&self, ctx: &Context<'_>, id: Uuid) -> Result<BlogPostObject> {
        Gate::admit(ctx, "getPost").await.gql()?;
        let posts = ctx.data_unchecked::<BlogPostService>();

        posts.get_post(id).await.map(BlogPostObject).gql()
    }

    async fn get_posts(
        &self,
        ctx: &Context<'_>,
        filter: Option<PostListOptions>,
    ) -> Result<BlogPostsResponse> {
        Gate::admit(ctx, "getPosts").await.gql()?;
        let posts = ctx.data_unchecked::<BlogPostService>();

        let options = filter.unwrap_or_default();
        let response = posts.get_posts(options.clone().into()).await.gql()?;

        Ok(BlogPostsResponse {
            results: response.results.into_iter().map(BlogPostObject).collect(),
            total: response.total,
            options,
        })
    }
}

#[derive(Default)]
pub struct BlogPostMutations;

#[Object]
impl BlogPostMutations {
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        create_post_input: CreateBlogPostInput,
    ) -> Result<BlogPostObject> {
        Gate::user(ctx, "createPost").await.gql()?;
        let posts = ctx.data_unchecked::<BlogPostService>();

        let request = CreateBlogPostRequest {
            blog_id: create_post_input.blog_id,
            title: create_post_input.title,
            body: create_post_input.body,
            is_publish: create_post_input.is_publish,
            tags: create_post_input.tags,
        };
        posts.create_post(request).await.map(BlogPostObject).gql()
    }

    async fn update_post(
        &self,
        ctx: &Context<'_>,
        update_post_input: UpdateBlogPostInput,
    ) -> Result<BlogPostObject> {
        let user = Gate::user(ctx, "updatePost").await.gql()?;
        let posts = ctx.data_unchecked::<BlogPostService>();

        let request = UpdateBlogPostRequest {
            id: update_post_input.id,
            title: update_post_input.title,
            body: update_post_input.body,
            is_publish: update_post_input.is_publish,
            tags: update_post_input.tags,
        };
        posts.update_post(&user, request).await.map(BlogPostObject).gql()
    }

    /// Permanent delete. `false` when there was nothing to delete.
    async fn delete_post(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let user = Gate::user(ctx, "deletePost").await.gql()?;
        let posts = ctx.data_unchecked::<BlogPostService>();

        posts.delete_post(&user, id).await.gql()
    }
}
