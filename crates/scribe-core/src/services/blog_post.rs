use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Blog, BlogPost, BlogPostField, User, normalize_tags};
use crate::error::DomainError;
use crate::ports::BlogPostRepository;
use crate::query::{FindOptions, Predicate, by_id};
use crate::services::listing::{FilteringPaginationSorting, ListResponse, non_empty};
use crate::services::{BaseService, BlogService};

#[derive(Debug, Clone)]
pub struct CreateBlogPostRequest {
    pub blog_id: Uuid,
    pub title: String,
    pub body: String,
    pub is_publish: bool,
    pub tags: Vec<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateBlogPostRequest {
    pub id: Uuid,
    pub title: Option<String>,
    pub body: Option<String>,
    pub is_publish: Option<bool>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPostFilter {
    pub id: Option<Uuid>,
    pub is_publish: Option<bool>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Posts carrying this tag.
    pub tag: Option<String>,
}

pub type BlogPostQuery = FilteringPaginationSorting<BlogPostFilter, BlogPostField>;
pub type BlogPostsResponse = ListResponse<BlogPost, BlogPostFilter, BlogPostField>;

#[derive(Clone)]
pub struct BlogPostService {
    posts: BaseService<BlogPost>,
    blogs: BlogService,
}

impl BlogPostService {
    pub fn new(posts: Arc<BlogPostRepository>, blogs: BlogService) -> Self {
        Self {
            posts: BaseService::new(posts),
            blogs,
        }
    }

    pub async fn create_post(&self, request: CreateBlogPostRequest) -> Result<BlogPost, DomainError> {
        if request.title.trim().is_empty() {
            return Err(DomainError::Validation("Post title must not be empty".to_string()));
        }
        let blog = self.blogs.get_blog(request.blog_id).await?;

        let mut post = self
            .posts
            .create(BlogPost::new(
                blog.id,
                request.title,
                request.body,
                request.is_publish,
                request.tags,
            ))
            .await?;
        tracing::info!(post_id = %post.id, blog_id = %blog.id, "Blog post created");

        post.blog = Some(blog);
        Ok(post)
    }

    /// Merge `request` into the stored post. Allowed for the blog's author
    /// and for moderators. Returns the post as re-read after the write.
    pub async fn update_post(
        &self,
        user: &User,
        request: UpdateBlogPostRequest,
    ) -> Result<BlogPost, DomainError> {
        let options = by_id::<BlogPost>(request.id).with_relations();
        let mut post = self.posts.find_one_or_fail(&options).await?;

        if !user.may_modify(owner_of(&post)?) {
            tracing::warn!(post_id = %post.id, user_id = %user.id, "Post update refused");
            return Err(DomainError::Forbidden(
                "You can only update your own blog posts.".to_string(),
            ));
        }

        if let Some(title) = request.title {
            if title.trim().is_empty() {
                return Err(DomainError::Validation("Post title must not be empty".to_string()));
            }
            post.title = title;
        }
        if let Some(body) = request.body {
            post.body = body;
        }
        if let Some(is_publish) = request.is_publish {
            post.is_publish = is_publish;
        }
        if let Some(tags) = request.tags {
            post.tags = normalize_tags(tags);
        }

        let id = post.id;
        self.posts.update(post).await?;
        self.get_post(id).await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<BlogPost, DomainError> {
        self.posts
            .find_one_or_fail(&by_id::<BlogPost>(id).with_relations())
            .await
    }

    pub async fn get_posts(&self, request: BlogPostQuery) -> Result<BlogPostsResponse, DomainError> {
        let options = request.paged(Self::filter_options(request.filter.as_ref()).with_relations());
        tracing::debug!(filter = %options.describe(), skip = ?options.skip, take = ?options.take, "Listing blog posts");

        let (results, total) = self.posts.find_and_count(&options).await?;

        Ok(BlogPostsResponse {
            results,
            total,
            options: request,
        })
    }

    /// Permanently delete a post. A missing post yields `false`.
    pub async fn delete_post(&self, user: &User, id: Uuid) -> Result<bool, DomainError> {
        let options = by_id::<BlogPost>(id).with_relations();
        let Some(post) = self.posts.find_one(&options).await? else {
            return Ok(false);
        };

        if !user.may_modify(owner_of(&post)?) {
            tracing::warn!(post_id = %id, user_id = %user.id, "Post delete refused");
            return Err(DomainError::Forbidden(
                "You can only delete your own blog posts.".to_string(),
            ));
        }

        let affected = self.posts.hard_delete(&options.filter).await?;
        tracing::info!(post_id = %id, user_id = %user.id, "Blog post deleted");
        Ok(affected > 0)
    }

    pub async fn get_main_blog(&self, id: Uuid) -> Result<Blog, DomainError> {
        self.blogs.get_blog(id).await
    }

    fn filter_options(filter: Option<&BlogPostFilter>) -> FindOptions<BlogPostField> {
        let Some(filter) = filter else {
            return FindOptions::new();
        };
        FindOptions::new()
            .and_maybe(filter.id.map(|id| Predicate::Eq(BlogPostField::Id, id.into())))
            .and_maybe(
                filter
                    .is_publish
                    .map(|p| Predicate::Eq(BlogPostField::IsPublish, p.into())),
            )
            .and_maybe(non_empty(&filter.title).map(|t| Predicate::ILike(BlogPostField::Title, t)))
            .and_maybe(non_empty(&filter.tag).map(|t| Predicate::Has(BlogPostField::Tags, t)))
    }
}

/// Author of the post's blog. Requires the blog relation to be loaded.
fn owner_of(post: &BlogPost) -> Result<Uuid, DomainError> {
    post.author_id().ok_or_else(|| {
        DomainError::Internal(format!("blog post {} loaded without its blog", post.id))
    })
}
