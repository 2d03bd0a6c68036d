//! Router assembly and application wiring.

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::middleware::{AuthState, Hs256TokenDecoder, auth_middleware, scope_middleware};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod views;

pub use services::AppServices;

/// Build the HTTP application.
///
/// Layer order (outermost first): authentication, then tenant scoping, then
/// routing. Every request gets a fresh tenant context; authorization happens
/// per-route, never in the middleware.
pub fn build_app(jwt_secret: &[u8], services: Arc<AppServices>) -> Router {
    let auth_state = AuthState {
        jwt: Arc::new(Hs256TokenDecoder::new(jwt_secret)),
    };

    let scoped = Router::new()
        .route("/whoami", get(routes::system::whoami))
        .nest("/cashboxes", routes::cashboxes::router())
        .nest("/invoices", routes::invoices::router())
        .merge(routes::expenses::router())
        .layer(axum::Extension(services))
        .layer(axum::middleware::from_fn(scope_middleware))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(scoped)
}
