use async_trait::async_trait;

use crate::domain::{Blog, BlogPost, User};
use crate::error::RepoError;
use crate::query::{FindOptions, Predicate, Record};

/// Generic repository trait defining standard CRUD operations.
///
/// Reads never return soft-deleted records unless the options ask for them.
#[async_trait]
pub trait BaseRepository<T: Record>: Send + Sync {
    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Find the first entity matching the options.
    async fn find_one(&self, options: &FindOptions<T::Field>) -> Result<Option<T>, RepoError>;

    /// Find a page of entities plus the total match count ignoring pagination.
    async fn find_and_count(
        &self,
        options: &FindOptions<T::Field>,
    ) -> Result<(Vec<T>, u64), RepoError>;

    /// Persist every column of an existing entity, matched by id.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Mark matching entities deleted. Returns the number affected.
    async fn soft_delete(&self, filter: &[Predicate<T::Field>]) -> Result<u64, RepoError>;

    /// Physically remove matching entities. Returns the number affected.
    async fn hard_delete(&self, filter: &[Predicate<T::Field>]) -> Result<u64, RepoError>;
}

/// User repository.
pub type UserRepository = dyn BaseRepository<User>;

/// Blog repository.
pub type BlogRepository = dyn BaseRepository<Blog>;

/// Blog post repository. Loading relations hydrates `BlogPost::blog`.
pub type BlogPostRepository = dyn BaseRepository<BlogPost>;
