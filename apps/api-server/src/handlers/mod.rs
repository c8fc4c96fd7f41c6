//! HTTP handlers and route configuration.

mod account;
mod auth;
mod graphql;
mod health;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/graphql")
            .route(web::post().to(graphql::graphql))
            .route(web::get().to(graphql::playground)),
    )
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/auth/register", web::post().to(auth::register))
            // Protected routes
            .route("/me", web::get().to(account::me)),
    );
}

#[cfg(test)]
mod tests;
