//! Repository implementations: PostgreSQL via SeaORM and an in-memory fallback.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
#[cfg(feature = "postgres")]
pub use connections::DatabaseConnections;
pub use memory::{InMemoryRepository, Relations};

#[cfg(feature = "postgres")]
pub use postgres_base::{Mapped, PostgresBaseRepository};
#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresBlogPostRepository, PostgresBlogRepository, PostgresUserRepository,
};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
