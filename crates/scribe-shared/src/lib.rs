//! # Scribe Shared
//!
//! Wire types shared between the API server and its clients.

pub mod dto;
pub mod response;

pub use dto::{AuthResponse, ErrorCode, HealthResponse, RegisterUserRequest};
pub use response::{ApiResponse, ErrorResponse};
