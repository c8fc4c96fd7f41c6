//! Operation registry and the single authorization gate in front of it.
//!
//! Every resolver names its operation when it calls [`Gate::admit`]; the
//! access rule comes from [`OPERATIONS`], never from the resolver itself.

use async_graphql::Context;
use scribe_core::DomainError;
use scribe_core::domain::{Role, User};
use scribe_core::services::UserService;

use crate::middleware::auth::Credentials;
use crate::middleware::error::AppError;

/// Who may invoke an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

/// Operation name → access rule.
pub const OPERATIONS: &[(&str, Access)] = &[
    // Blog
    ("getBlogById", Access::Public),
    ("blogs", Access::Public),
    ("getBlogPosts", Access::Public),
    ("createBlog", Access::Role(Role::Writer)),
    ("updateBlog", Access::Authenticated),
    ("deleteBlog", Access::Authenticated),
    // Blog post
    ("getPost", Access::Public),
    ("getPosts", Access::Public),
    ("createPost", Access::Role(Role::Writer)),
    ("updatePost", Access::Authenticated),
    ("deletePost", Access::Authenticated),
    // User
    ("me", Access::Authenticated),
    ("updateUserRole", Access::Role(Role::Moderator)),
];

pub fn access(operation: &str) -> Option<Access> {
    OPERATIONS
        .iter()
        .find(|(name, _)| *name == operation)
        .map(|(_, access)| *access)
}

/// Decide whether `user` may run an operation guarded by `access`.
pub fn check(access: Access, user: Option<&User>) -> Result<(), AppError> {
    let required = match access {
        Access::Public => return Ok(()),
        Access::Authenticated => None,
        Access::Role(role) => Some(role),
    };

    let Some(user) = user else {
        return Err(AppError::Unauthenticated("Authentication required".to_string()));
    };

    match required {
        Some(role) if !user.role.satisfies(role) => {
            tracing::debug!(user_id = %user.id, role = %user.role, required = %role, "Role check failed");
            Err(AppError::Forbidden(format!("Requires the {role} role.")))
        }
        _ => Ok(()),
    }
}

pub struct Gate;

impl Gate {
    /// Check `operation` against the registry and return the acting user.
    ///
    /// Public operations never touch credentials and yield `None`. Guarded
    /// operations load the token subject from the user store.
    pub async fn admit(ctx: &Context<'_>, operation: &str) -> Result<Option<User>, AppError> {
        let access = access(operation).ok_or_else(|| {
            AppError::Internal(format!("operation {operation} is not registered"))
        })?;
        if access == Access::Public {
            return Ok(None);
        }

        let user = match ctx.data_opt::<Credentials>() {
            None | Some(Credentials::Anonymous) => None,
            Some(Credentials::Rejected(reason)) => {
                return Err(AppError::Unauthenticated(reason.clone()));
            }
            Some(Credentials::Verified(identity)) => {
                let users = ctx.data_unchecked::<UserService>();
                match users.get_user(identity.user_id).await {
                    Ok(user) => Some(user),
                    Err(DomainError::NotFound { .. }) => {
                        return Err(AppError::Unauthenticated("Unknown user".to_string()));
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        check(access, user.as_ref())?;
        Ok(user)
    }

    /// [`Gate::admit`] for operations that always have an acting user.
    pub async fn user(ctx: &Context<'_>, operation: &str) -> Result<User, AppError> {
        Self::admit(ctx, operation)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Authentication required".to_string()))
    }
}
