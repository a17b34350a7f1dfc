use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::services::DirectoryService;

/// Public directory routes, mounted under `/api/doctors`.
pub fn doctor_routes(service: Arc<DirectoryService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/locations", get(handlers::list_locations))
        .with_state(service)
}
