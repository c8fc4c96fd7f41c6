//! In-memory repository fake for service tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Blog, BlogPost, Role, User};
use crate::error::RepoError;
use crate::ports::BaseRepository;
use crate::query::{self, FindOptions, Predicate, Record};

type Hydrate<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

pub struct FakeRepo<T: Record> {
    rows: Arc<Mutex<Vec<T>>>,
    hydrate: Option<Hydrate<T>>,
}

impl<T: Record> Clone for FakeRepo<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            hydrate: self.hydrate.clone(),
        }
    }
}

impl<T: Record> FakeRepo<T> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            hydrate: None,
        }
    }

    pub fn seed(&self, entity: T) -> T {
        self.rows.lock().unwrap().push(entity.clone());
        entity
    }

    pub fn raw(&self, id: uuid::Uuid) -> Option<T> {
        self.rows.lock().unwrap().iter().find(|r| r.id() == id).cloned()
    }
}

impl FakeRepo<BlogPost> {
    pub fn posts(blogs: &FakeRepo<Blog>) -> Self {
        let blogs = blogs.clone();
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            hydrate: Some(Arc::new(move |post: &mut BlogPost| {
                post.blog = blogs.raw(post.blog_id);
            })),
        }
    }
}

#[async_trait]
impl<T: Record> BaseRepository<T> for FakeRepo<T> {
    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        Ok(self.seed(entity))
    }

    async fn find_one(&self, options: &FindOptions<T::Field>) -> Result<Option<T>, RepoError> {
        let (rows, _) = self.find_and_count(options).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_and_count(
        &self,
        options: &FindOptions<T::Field>,
    ) -> Result<(Vec<T>, u64), RepoError> {
        let rows = self.rows.lock().unwrap().clone();
        let (mut page, total) = query::apply(rows, options);
        if let (true, Some(hydrate)) = (options.relations, &self.hydrate) {
            page.iter_mut().for_each(|r| hydrate(r));
        }
        Ok((page, total))
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|r| r.id() == entity.id())
            .ok_or(RepoError::NotFound)?;
        *slot = entity.clone();
        Ok(entity)
    }

    async fn soft_delete(&self, filter: &[Predicate<T::Field>]) -> Result<u64, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let mut affected = 0;
        for row in rows.iter_mut().filter(|r| query::matches_all(&**r, filter, false)) {
            row.set_deleted_at(Some(Utc::now()));
            affected += 1;
        }
        Ok(affected)
    }

    async fn hard_delete(&self, filter: &[Predicate<T::Field>]) -> Result<u64, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !query::matches_all(r, filter, true));
        Ok((before - rows.len()) as u64)
    }
}

pub fn user(role: Role) -> User {
    let id = uuid::Uuid::new_v4();
    User::new(format!("{}@example.com", id.simple()), "Someone".to_string(), role)
}
