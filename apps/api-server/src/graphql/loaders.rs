//! DataLoaders for fields resolved on demand.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::Loader;
use scribe_core::DomainError;
use scribe_core::domain::User;
use scribe_core::services::UserService;
use uuid::Uuid;

/// Batches `Blog.author` lookups issued within one request tick into a
/// single `IN` query.
pub struct AuthorLoader {
    users: UserService,
}

impl AuthorLoader {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

impl Loader<Uuid> for AuthorLoader {
    type Value = User;
    type Error = Arc<DomainError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(authors = keys.len(), "Batch loading authors");

        let users = self.users.get_users(keys).await.map_err(Arc::new)?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}
