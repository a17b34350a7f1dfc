use std::process::Stdio;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::process::Command;
use tracing::{error, info, warn};

use shared_config::AppConfig;
use shared_models::error::AppError;

/// `/start-analyzer`: launches the external report analyzer outside production.
pub fn analyzer_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/start-analyzer", get(start_analyzer))
        .with_state(config)
}

async fn start_analyzer(State(config): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    if config.is_production() {
        return Err(AppError::Forbidden(
            "Disabled in production. Deploy the report analyzer separately.".to_string(),
        ));
    }

    let port = config.analyzer_port.to_string();

    let mut child = Command::new(&config.analyzer_command)
        .arg("run")
        .arg(&config.analyzer_script)
        .args(["--server.port", &port, "--server.headless", "true"])
        .stdin(Stdio::null())
        .spawn()
        .map_err(|e| {
            error!("Error starting report analyzer: {}", e);
            AppError::Internal("Failed to start report analyzer".to_string())
        })?;

    info!(pid = ?child.id(), port = %port, "report_analyzer_started");

    // reap the child; its lifetime is not tied to the request
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if status.success() => info!("Report analyzer exited"),
            Ok(status) => warn!("Report analyzer exited with {}", status),
            Err(e) => error!("Failed waiting on report analyzer: {}", e),
        }
    });

    Ok(Json(json!({
        "message": format!("Report Analyzer started on http://localhost:{}", port)
    })))
}
