//! In-memory repositories - used as fallback when no database is configured.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use scribe_core::domain::{Blog, BlogPost};
use scribe_core::error::RepoError;
use scribe_core::ports::BaseRepository;
use scribe_core::query::{self, FindOptions, Predicate, Record};

/// Attaches related records to a page of results.
#[async_trait]
pub trait Relations<T>: Send + Sync {
    async fn load(&self, records: Vec<T>) -> Vec<T>;
}

/// Resolves `BlogPost::blog` against a shared blog store, soft-deleted blogs included.
struct BlogRelation {
    blogs: Arc<RwLock<Vec<Blog>>>,
}

#[async_trait]
impl Relations<BlogPost> for BlogRelation {
    async fn load(&self, mut posts: Vec<BlogPost>) -> Vec<BlogPost> {
        let blogs = self.blogs.read().await;
        for post in &mut posts {
            post.blog = blogs.iter().find(|b| b.id == post.blog_id).cloned();
        }
        posts
    }
}

/// Vec-backed repository with async RwLock.
///
/// Rows keep insertion order. Data is lost on process restart.
pub struct InMemoryRepository<T: Record> {
    rows: Arc<RwLock<Vec<T>>>,
    relations: Option<Arc<dyn Relations<T>>>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            relations: None,
        }
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository<BlogPost> {
    /// Post store whose relation loading reads from `blogs`.
    pub fn with_blogs(blogs: &InMemoryRepository<Blog>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            relations: Some(Arc::new(BlogRelation {
                blogs: Arc::clone(&blogs.rows),
            })),
        }
    }
}

#[async_trait]
impl<T: Record> BaseRepository<T> for InMemoryRepository<T> {
    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.id() == entity.id()) {
            return Err(RepoError::Constraint(format!(
                "{} {} already exists",
                T::ENTITY,
                entity.id()
            )));
        }
        rows.push(entity.clone());
        Ok(entity)
    }

    async fn find_one(&self, options: &FindOptions<T::Field>) -> Result<Option<T>, RepoError> {
        let (rows, _) = self.find_and_count(options).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_and_count(
        &self,
        options: &FindOptions<T::Field>,
    ) -> Result<(Vec<T>, u64), RepoError> {
        let rows = self.rows.read().await.clone();
        let (page, total) = query::apply(rows, options);

        let page = match (&self.relations, options.relations) {
            (Some(relations), true) if !page.is_empty() => relations.load(page).await,
            _ => page,
        };
        Ok((page, total))
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|r| r.id() == entity.id())
            .ok_or(RepoError::NotFound)?;
        *slot = entity.clone();
        Ok(entity)
    }

    async fn soft_delete(&self, filter: &[Predicate<T::Field>]) -> Result<u64, RepoError> {
        let mut rows = self.rows.write().await;
        let now = Utc::now();
        let mut affected = 0;
        for row in rows
            .iter_mut()
            .filter(|r| query::matches_all(&**r, filter, false))
        {
            row.set_deleted_at(Some(now));
            affected += 1;
        }
        tracing::debug!(entity = T::ENTITY, rows = affected, "Soft-deleted rows");
        Ok(affected)
    }

    async fn hard_delete(&self, filter: &[Predicate<T::Field>]) -> Result<u64, RepoError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !query::matches_all(r, filter, true));
        let affected = (before - rows.len()) as u64;
        tracing::debug!(entity = T::ENTITY, rows = affected, "Hard-deleted rows");
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::domain::BlogPostField;
    use scribe_core::query::{Value, by_id};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryRepository::<Blog>::new();
        let blog = repo
            .insert(Blog::new(Uuid::new_v4(), "Notes".to_string(), None))
            .await
            .unwrap();

        let found = repo.find_one(&by_id::<Blog>(blog.id)).await.unwrap();
        assert_eq!(found, Some(blog));
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_is_constraint_error() {
        let repo = InMemoryRepository::<Blog>::new();
        let blog = Blog::new(Uuid::new_v4(), "Notes".to_string(), None);
        repo.insert(blog.clone()).await.unwrap();

        let result = repo.insert(blog).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_soft_deleted_rows_are_hidden() {
        let repo = InMemoryRepository::<Blog>::new();
        let blog = repo
            .insert(Blog::new(Uuid::new_v4(), "Notes".to_string(), None))
            .await
            .unwrap();

        let affected = repo.soft_delete(&by_id::<Blog>(blog.id).filter).await.unwrap();
        assert_eq!(affected, 1);

        assert!(repo.find_one(&by_id::<Blog>(blog.id)).await.unwrap().is_none());
        let with_deleted = by_id::<Blog>(blog.id).with_deleted();
        assert!(repo.find_one(&with_deleted).await.unwrap().is_some());

        // Already deleted rows are not counted again.
        assert_eq!(repo.soft_delete(&by_id::<Blog>(blog.id).filter).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let repo = InMemoryRepository::<Blog>::new();
        let result = repo
            .update(Blog::new(Uuid::new_v4(), "Ghost".to_string(), None))
            .await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_relations_attach_blog_even_when_soft_deleted() {
        let blogs = InMemoryRepository::<Blog>::new();
        let posts = InMemoryRepository::with_blogs(&blogs);
        let blog = blogs
            .insert(Blog::new(Uuid::new_v4(), "Notes".to_string(), None))
            .await
            .unwrap();
        let post = posts
            .insert(BlogPost::new(blog.id, "Hello".into(), "Body".into(), true, vec![]))
            .await
            .unwrap();
        blogs.soft_delete(&by_id::<Blog>(blog.id).filter).await.unwrap();

        let plain = posts.find_one(&by_id::<BlogPost>(post.id)).await.unwrap().unwrap();
        assert!(plain.blog.is_none());

        let hydrated = posts
            .find_one(&by_id::<BlogPost>(post.id).with_relations())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hydrated.author_id(), Some(blog.author_id));
    }

    #[tokio::test]
    async fn test_hard_delete_removes_rows() {
        let blogs = InMemoryRepository::<Blog>::new();
        let posts = InMemoryRepository::with_blogs(&blogs);
        let blog_id = Uuid::new_v4();
        posts
            .insert(BlogPost::new(blog_id, "a".into(), "b".into(), false, vec![]))
            .await
            .unwrap();
        posts
            .insert(BlogPost::new(blog_id, "c".into(), "d".into(), true, vec![]))
            .await
            .unwrap();

        let filter = [Predicate::Eq(BlogPostField::BlogId, Value::Uuid(blog_id))];
        assert_eq!(posts.hard_delete(&filter).await.unwrap(), 2);

        let (rows, total) = posts
            .find_and_count(&FindOptions::new().with_deleted())
            .await
            .unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 0);
    }
}
