use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use scribe_core::domain::{Role, User};
use scribe_core::ports::TokenService;
use scribe_core::services::CreateUserRequest;
use scribe_infra::{JwtConfig, JwtTokenService};
use serde_json::{Value, json};

use super::configure_routes;
use crate::graphql::build_schema;
use crate::observability::RequestIdMiddleware;
use crate::state::{AppState, Repositories, Storage};

fn state() -> AppState {
    let token_service: Arc<dyn TokenService> =
        Arc::new(JwtTokenService::new(JwtConfig::default()));
    AppState::from_parts(Repositories::in_memory(), token_service, Storage::Memory)
}

macro_rules! service {
    ($state:expr) => {{
        let state: AppState = $state;
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(build_schema(&state)))
                .app_data(web::Data::new(state.token_service.clone()))
                .app_data(web::Data::new(state.clone()))
                .configure(configure_routes),
        )
        .await
    }};
}

async fn writer(state: &AppState) -> (User, String) {
    let user = state
        .users
        .create_user(CreateUserRequest {
            email: "writer@example.com".to_string(),
            name: "Writer".to_string(),
            role: Role::Writer,
        })
        .await
        .unwrap();
    let token = state.token_service.generate_token(user.id, &user.email).unwrap();
    (user, token)
}

#[actix_web::test]
async fn test_health_reports_storage() {
    let app = service!(state());

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["storage"], "memory");
}

#[actix_web::test]
async fn test_me_requires_token() {
    let app = service!(state());

    let req = test::TestRequest::get().uri("/api/me").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[actix_web::test]
async fn test_me_returns_account() {
    let state = state();
    let (user, token) = writer(&state).await;
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["id"], user.id.to_string());
    assert_eq!(body["data"]["role"], "writer");
}

#[actix_web::test]
async fn test_graphql_mutation_with_bearer_token() {
    let state = state();
    let (_, token) = writer(&state).await;
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/graphql")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({
            "query": r#"mutation { createBlog(createBlogInput: { title: "Over HTTP" }) { title author { email } } }"#
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["createBlog"]["title"], "Over HTTP");
    assert_eq!(body["data"]["createBlog"]["author"]["email"], "writer@example.com");
}

#[actix_web::test]
async fn test_graphql_bad_token_only_blocks_guarded_operations() {
    let app = service!(state());

    let public = test::TestRequest::post()
        .uri("/graphql")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .set_json(json!({ "query": "{ blogs { total } }" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, public).await;
    assert_eq!(body["data"]["blogs"]["total"], 0);

    let guarded = test::TestRequest::post()
        .uri("/graphql")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .set_json(json!({ "query": "{ me { id } }" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, guarded).await;
    assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");
}

#[actix_web::test]
async fn test_playground_is_served() {
    let app = service!(state());

    let req = test::TestRequest::get().uri("/graphql").to_request();
    let res = test::call_service(&app, req).await;

    assert!(res.status().is_success());
}

#[actix_web::test]
async fn test_register_issues_token_and_first_account_moderates() {
    let app = service!(state());

    let register = |email: &str| {
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "email": email, "name": "Someone" }))
            .to_request()
    };

    let res = test::call_service(&app, register("first@example.com")).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 86400);
    let token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["email"], "first@example.com");
    assert_eq!(body["data"]["role"], "moderator");

    let res = test::call_service(&app, register("second@example.com")).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(&app, register("FIRST@example.com")).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "CONFLICT");
}

#[actix_web::test]
async fn test_graphql_errors_carry_request_id() {
    let app = service!(state());

    let req = test::TestRequest::post()
        .uri("/graphql")
        .insert_header(("X-Request-ID", "req-42"))
        .set_json(json!({ "query": "{ me { id } }" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.headers().get("X-Request-ID").unwrap(), "req-42");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");
    assert_eq!(body["errors"][0]["extensions"]["requestId"], "req-42");
}
