//! REST view of the authenticated account.

use actix_web::{HttpResponse, web};
use scribe_core::DomainError;
use scribe_shared::ApiResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/me - Protected route
pub async fn me(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let user = match state.users.get_user(identity.user_id).await {
        Ok(user) => user,
        Err(DomainError::NotFound { .. }) => {
            return Err(AppError::Unauthenticated("Unknown user".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}
