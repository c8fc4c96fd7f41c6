//! Self-service registration.

use actix_web::{HttpResponse, web};
use scribe_shared::{AuthResponse, RegisterUserRequest};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/register - Create an account and issue its bearer token.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let user = state.users.register(body.email, body.name).await?;

    let access_token = state.token_service.generate_token(user.id, &user.email)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.token_service.expiration_seconds().max(0) as u64,
    }))
}
