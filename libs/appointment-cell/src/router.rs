// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::BookingService;

/// Booking routes, mounted under `/api/users`. Every route requires a session credential.
pub fn appointment_routes(config: Arc<AppConfig>, service: Arc<BookingService>) -> Router {
    Router::new()
        .route("/book-appointment", post(handlers::book_appointment))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(service)
}
