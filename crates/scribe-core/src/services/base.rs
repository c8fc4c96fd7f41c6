//! Generic CRUD façade shared by every entity service.
//!
//! No authorization happens here; callers decide who may invoke what.

use std::sync::Arc;

use crate::error::{DomainError, RepoError};
use crate::ports::BaseRepository;
use crate::query::{FindOptions, Predicate, Record};

pub struct BaseService<T: Record> {
    repo: Arc<dyn BaseRepository<T>>,
}

impl<T: Record> Clone for BaseService<T> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<T: Record> BaseService<T> {
    pub fn new(repo: Arc<dyn BaseRepository<T>>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, entity: T) -> Result<T, DomainError> {
        Ok(self.repo.insert(entity).await?)
    }

    pub async fn find_one(&self, options: &FindOptions<T::Field>) -> Result<Option<T>, DomainError> {
        Ok(self.repo.find_one(options).await?)
    }

    /// Like [`find_one`](Self::find_one) but absence is a `NotFound` error.
    pub async fn find_one_or_fail(&self, options: &FindOptions<T::Field>) -> Result<T, DomainError> {
        self.find_one(options)
            .await?
            .ok_or_else(|| DomainError::not_found(T::ENTITY, options.describe()))
    }

    pub async fn find_and_count(
        &self,
        options: &FindOptions<T::Field>,
    ) -> Result<(Vec<T>, u64), DomainError> {
        Ok(self.repo.find_and_count(options).await?)
    }

    /// Persist a merged entity, bumping `updated_at`.
    pub async fn update(&self, mut entity: T) -> Result<T, DomainError> {
        let id = entity.id();
        entity.touch();
        self.repo.update(entity).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found(T::ENTITY, format!("id = {}", id)),
            other => other.into(),
        })
    }

    pub async fn soft_delete(&self, filter: &[Predicate<T::Field>]) -> Result<u64, DomainError> {
        Ok(self.repo.soft_delete(filter).await?)
    }

    pub async fn hard_delete(&self, filter: &[Predicate<T::Field>]) -> Result<u64, DomainError> {
        Ok(self.repo.hard_delete(filter).await?)
    }
}
