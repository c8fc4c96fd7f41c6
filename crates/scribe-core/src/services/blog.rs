use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Blog, BlogField, BlogPost, BlogPostField, User};
use crate::error::DomainError;
use crate::ports::{BlogPostRepository, BlogRepository};
use crate::query::{FindOptions, Predicate, Value, by_id};
use crate::services::listing::{FilteringPaginationSorting, ListResponse, non_empty};
use crate::services::{BaseService, UserService};

#[derive(Debug, Clone)]
pub struct CreateBlogRequest {
    pub title: String,
    pub description: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateBlogRequest {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogFilter {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub author_id: Option<Uuid>,
}

pub type BlogQuery = FilteringPaginationSorting<BlogFilter, BlogField>;
pub type BlogsResponse = ListResponse<Blog, BlogFilter, BlogField>;

#[derive(Clone)]
pub struct BlogService {
    blogs: BaseService<Blog>,
    posts: BaseService<BlogPost>,
    users: UserService,
}

impl BlogService {
    pub fn new(
        blogs: Arc<BlogRepository>,
        posts: Arc<BlogPostRepository>,
        users: UserService,
    ) -> Self {
        Self {
            blogs: BaseService::new(blogs),
            posts: BaseService::new(posts),
            users,
        }
    }

    /// Create a blog authored by `user`.
    pub async fn create_blog(
        &self,
        user: &User,
        request: CreateBlogRequest,
    ) -> Result<Blog, DomainError> {
        if request.title.trim().is_empty() {
            return Err(DomainError::Validation("Blog title must not be empty".to_string()));
        }
        let author = self.users.get_user(user.id).await?;

        let blog = self
            .blogs
            .create(Blog::new(author.id, request.title, request.description))
            .await?;
        tracing::info!(blog_id = %blog.id, author_id = %author.id, "Blog created");
        Ok(blog)
    }

    pub async fn update_blog(
        &self,
        user: &User,
        request: UpdateBlogRequest,
    ) -> Result<Blog, DomainError> {
        let mut blog = self.get_blog(request.id).await?;
        if !user.may_modify(blog.author_id) {
            return Err(DomainError::Forbidden(
                "You can only update your own blogs.".to_string(),
            ));
        }

        if let Some(title) = request.title {
            if title.trim().is_empty() {
                return Err(DomainError::Validation("Blog title must not be empty".to_string()));
            }
            blog.title = title;
        }
        if let Some(description) = request.description {
            blog.description = Some(description);
        }

        self.blogs.update(blog).await?;
        self.get_blog(request.id).await
    }

    /// Soft-delete a blog. Returns whether anything was removed.
    pub async fn delete_blog(&self, user: &User, id: Uuid) -> Result<bool, DomainError> {
        let Some(blog) = self.blogs.find_one(&by_id::<Blog>(id)).await? else {
            return Ok(false);
        };
        if !user.may_modify(blog.author_id) {
            return Err(DomainError::Forbidden(
                "You can only delete your own blogs.".to_string(),
            ));
        }

        let affected = self.blogs.soft_delete(&by_id::<Blog>(id).filter).await?;
        tracing::info!(blog_id = %id, user_id = %user.id, "Blog soft-deleted");
        Ok(affected > 0)
    }

    pub async fn get_blog(&self, id: Uuid) -> Result<Blog, DomainError> {
        self.blogs.find_one_or_fail(&by_id::<Blog>(id)).await
    }

    pub async fn get_blogs(&self, request: BlogQuery) -> Result<BlogsResponse, DomainError> {
        let options = request.paged(Self::filter_options(request.filter.as_ref()));
        let (results, total) = self.blogs.find_and_count(&options).await?;

        Ok(BlogsResponse {
            results,
            total,
            options: request,
        })
    }

    /// Posts belonging to a blog, each with its blog relation attached.
    pub async fn find_related_posts(&self, blog_id: Uuid) -> Result<Vec<BlogPost>, DomainError> {
        let blog = self.get_blog(blog_id).await?;
        let options = FindOptions::new().and(Predicate::Eq(
            BlogPostField::BlogId,
            Value::Uuid(blog_id),
        ));
        let (posts, _) = self.posts.find_and_count(&options).await?;

        Ok(posts
            .into_iter()
            .map(|mut post| {
                post.blog = Some(blog.clone());
                post
            })
            .collect())
    }

    pub async fn get_author(&self, author_id: Uuid) -> Result<User, DomainError> {
        self.users.get_user(author_id).await
    }

    fn filter_options(filter: Option<&BlogFilter>) -> FindOptions<BlogField> {
        let Some(filter) = filter else {
            return FindOptions::new();
        };
        FindOptions::new()
            .and_maybe(filter.id.map(|id| Predicate::Eq(BlogField::Id, id.into())))
            .and_maybe(
                filter
                    .author_id
                    .map(|id| Predicate::Eq(BlogField::AuthorId, id.into())),
            )
            .and_maybe(non_empty(&filter.title).map(|t| Predicate::ILike(BlogField::Title, t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::services::listing::Pagination;
    use crate::services::testing::{FakeRepo, user};

    struct Fixture {
        service: BlogService,
        users: FakeRepo<User>,
        blogs: FakeRepo<Blog>,
        posts: FakeRepo<BlogPost>,
    }

    fn fixture() -> Fixture {
        let users = FakeRepo::<User>::new();
        let blogs = FakeRepo::<Blog>::new();
        let posts = FakeRepo::posts(&blogs);
        let service = BlogService::new(
            Arc::new(blogs.clone()),
            Arc::new(posts.clone()),
            UserService::new(Arc::new(users.clone())),
        );
        Fixture {
            service,
            users,
            blogs,
            posts,
        }
    }

    #[tokio::test]
    async fn test_create_blog_sets_author() {
        let f = fixture();
        let writer = f.users.seed(user(Role::Writer));

        let blog = f
            .service
            .create_blog(
                &writer,
                CreateBlogRequest {
                    title: "Notes".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(blog.author_id, writer.id);
        assert_eq!(f.service.get_author(blog.author_id).await.unwrap(), writer);
    }

    #[tokio::test]
    async fn test_create_blog_requires_existing_author() {
        let f = fixture();
        let ghost = user(Role::Writer);

        let result = f
            .service
            .create_blog(
                &ghost,
                CreateBlogRequest {
                    title: "Notes".to_string(),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_blog_forbidden_for_stranger() {
        let f = fixture();
        let owner = f.users.seed(user(Role::Writer));
        let stranger = f.users.seed(user(Role::Writer));
        let blog = f.blogs.seed(Blog::new(owner.id, "Mine".to_string(), None));

        let result = f
            .service
            .update_blog(
                &stranger,
                UpdateBlogRequest {
                    id: blog.id,
                    title: Some("Theirs".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Forbidden(_))));
        assert_eq!(f.blogs.raw(blog.id).unwrap().title, "Mine");
    }

    #[tokio::test]
    async fn test_moderator_updates_any_blog() {
        let f = fixture();
        let owner = f.users.seed(user(Role::Writer));
        let moderator = f.users.seed(user(Role::Moderator));
        let blog = f.blogs.seed(Blog::new(owner.id, "Mine".to_string(), None));

        let updated = f
            .service
            .update_blog(
                &moderator,
                UpdateBlogRequest {
                    id: blog.id,
                    description: Some("Edited".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Mine");
        assert_eq!(updated.description.as_deref(), Some("Edited"));
        assert_eq!(updated.author_id, owner.id);
    }

    #[tokio::test]
    async fn test_delete_blog_is_soft() {
        let f = fixture();
        let owner = f.users.seed(user(Role::Writer));
        let blog = f.blogs.seed(Blog::new(owner.id, "Mine".to_string(), None));

        assert!(f.service.delete_blog(&owner, blog.id).await.unwrap());

        assert!(f.blogs.raw(blog.id).unwrap().deleted_at.is_some());
        assert!(matches!(
            f.service.get_blog(blog.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(!f.service.delete_blog(&owner, blog.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_blogs_filters_and_counts() {
        let f = fixture();
        let a = f.users.seed(user(Role::Writer));
        let b = f.users.seed(user(Role::Writer));
        f.blogs.seed(Blog::new(a.id, "Rust Weekly".to_string(), None));
        f.blogs.seed(Blog::new(a.id, "rust daily".to_string(), None));
        f.blogs.seed(Blog::new(b.id, "Cooking".to_string(), None));

        let response = f
            .service
            .get_blogs(BlogQuery {
                filter: Some(BlogFilter {
                    title: Some("RUST".to_string()),
                    ..Default::default()
                }),
                pagination: Some(Pagination {
                    offset: None,
                    limit: Some(1),
                }),
                sorting: None,
            })
            .await
            .unwrap();

        assert_eq!(response.total, 2);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.options.pagination.unwrap().limit, Some(1));
    }

    #[tokio::test]
    async fn test_find_related_posts() {
        let f = fixture();
        let owner = f.users.seed(user(Role::Writer));
        let blog = f.blogs.seed(Blog::new(owner.id, "Mine".to_string(), None));
        let other = f.blogs.seed(Blog::new(owner.id, "Other".to_string(), None));
        f.posts.seed(BlogPost::new(blog.id, "one".into(), "b".into(), true, vec![]));
        f.posts.seed(BlogPost::new(other.id, "two".into(), "b".into(), true, vec![]));

        let posts = f.service.find_related_posts(blog.id).await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "one");
        assert_eq!(posts[0].blog.as_ref(), Some(&blog));
        assert!(matches!(
            f.service.find_related_posts(Uuid::new_v4()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title() {
        let f = fixture();
        let owner = f.users.seed(user(Role::Writer));
        let blog = f.blogs.seed(Blog::new(owner.id, "Kept".to_string(), None));

        let result = f
            .service
            .update_blog(
                &owner,
                UpdateBlogRequest {
                    id: blog.id,
                    title: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(f.blogs.raw(blog.id).unwrap().title, "Kept");
    }
}
