use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers;
use crate::services::IdentityService;

/// Public routes: `/register` and `/login`.
pub fn auth_routes(service: Arc<IdentityService>) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .with_state(service)
}
