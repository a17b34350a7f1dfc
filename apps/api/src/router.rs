use std::path::Path;

use axum::{
    http::{header::{AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;

use crate::analyzer::analyzer_routes;
use crate::context::AppContext;

pub fn create_router(context: &AppContext) -> Router {
    let config = &context.config;

    let user_routes = Router::new()
        .merge(auth_routes(context.identity.clone()))
        .merge(appointment_routes(config.clone(), context.booking.clone()));

    let api = Router::new()
        .merge(auth_routes(context.identity.clone()))
        .nest("/api/users", user_routes)
        .nest("/api/doctors", doctor_routes(context.directory.clone()))
        .merge(analyzer_routes(config.clone()));

    let frontend = Path::new(&config.frontend_dist);
    if config.is_production() && frontend.is_dir() {
        info!("Serving frontend from {}", frontend.display());
        let index = ServeFile::new(frontend.join("index.html"));
        api.fallback_service(ServeDir::new(frontend).fallback(index))
    } else {
        api.route("/", get(|| async { "HealthEase API is running!" }))
    }
}

pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .client_urls
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}
