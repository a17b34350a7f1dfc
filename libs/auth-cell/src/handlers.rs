use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_models::error::AppError;

use crate::models::{IdentityError, LoginRequest, LoginResponse, RegisterRequest};
use crate::services::IdentityService;

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Validation(msg) => AppError::ValidationError(msg),
            IdentityError::DuplicateIdentity => {
                AppError::BadRequest("User already exists with this ID, username, or email.".to_string())
            }
            IdentityError::InvalidCredentials => AppError::BadRequest("Invalid credentials.".to_string()),
            IdentityError::StoreUnavailable(detail) | IdentityError::Internal(detail) => {
                error!("Identity request failed: {}", detail);
                AppError::Internal("Internal server error".to_string())
            }
        }
    }
}

fn malformed_body(rejection: JsonRejection) -> AppError {
    debug!("Rejected request body: {}", rejection.body_text());
    AppError::BadRequest("Malformed request body".to_string())
}

#[axum::debug_handler]
pub async fn register(
    State(service): State<Arc<IdentityService>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(request) = payload.map_err(malformed_body)?;

    service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(service): State<Arc<IdentityService>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = payload.map_err(malformed_body)?;

    let response = service.login(request).await?;

    Ok(Json(response))
}
