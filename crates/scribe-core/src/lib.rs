//! # Scribe Core
//!
//! The domain layer of the Scribe blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the query model, repository ports, and the services that enforce
//! ownership rules on top of them.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod services;

pub use error::DomainError;
