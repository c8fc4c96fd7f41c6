//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::domain::{Blog, BlogPost, User};
use scribe_core::ports::{BlogPostRepository, BlogRepository, TokenService, UserRepository};
use scribe_core::services::{BlogPostService, BlogService, UserService};
use scribe_infra::{DatabaseConfig, InMemoryRepository, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
use scribe_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use scribe_infra::database::{
    PostgresBlogPostRepository, PostgresBlogRepository, PostgresUserRepository,
};

/// Backing store in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

impl Storage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Storage::Postgres => "postgres",
            Storage::Memory => "memory",
        }
    }
}

/// The three repositories every service is built from.
pub struct Repositories {
    pub users: Arc<UserRepository>,
    pub blogs: Arc<BlogRepository>,
    pub posts: Arc<BlogPostRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let blogs = InMemoryRepository::<Blog>::new();
        let posts = InMemoryRepository::<BlogPost>::with_blogs(&blogs);
        Self {
            users: Arc::new(InMemoryRepository::<User>::new()),
            blogs: Arc::new(blogs),
            posts: Arc::new(posts),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(connections: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(connections.main.clone())),
            blogs: Arc::new(PostgresBlogRepository::new(connections.main.clone())),
            posts: Arc::new(PostgresBlogPostRepository::new(connections.main.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub blogs: BlogService,
    pub posts: BlogPostService,
    pub token_service: Arc<dyn TokenService>,
    pub storage: Storage,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, jwt: JwtConfig) -> Self {
        let (repos, storage) = Self::repositories(db_config).await;
        let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(jwt));

        tracing::info!(storage = storage.as_str(), "Application state initialized");
        Self::from_parts(repos, token_service, storage)
    }

    pub fn from_parts(
        repos: Repositories,
        token_service: Arc<dyn TokenService>,
        storage: Storage,
    ) -> Self {
        let users = UserService::new(repos.users);
        let blogs = BlogService::new(repos.blogs, repos.posts.clone(), users.clone());
        let posts = BlogPostService::new(repos.posts, blogs.clone());

        Self {
            users,
            blogs,
            posts,
            token_service,
            storage,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(db_config: Option<&DatabaseConfig>) -> (Repositories, Storage) {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (Repositories::in_memory(), Storage::Memory);
        };

        match DatabaseConnections::init(config).await {
            Ok(connections) => (Repositories::postgres(&connections), Storage::Postgres),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                (Repositories::in_memory(), Storage::Memory)
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_db_config: Option<&DatabaseConfig>) -> (Repositories, Storage) {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        (Repositories::in_memory(), Storage::Memory)
    }
}
