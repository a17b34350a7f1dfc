// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_models::auth::SessionUser;
use shared_models::error::AppError;

use crate::models::{BookAppointmentRequest, BookingError};
use crate::services::BookingService;

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Unauthorized => AppError::Auth("Unauthorized".to_string()),
            BookingError::StoreUnavailable(detail) => {
                error!("Appointment could not be stored: {}", detail);
                AppError::Internal("Error booking the appointment".to_string())
            }
        }
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(service): State<Arc<BookingService>>,
    Extension(user): Extension<SessionUser>,
    payload: Result<Json<BookAppointmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected booking body: {}", rejection.body_text());
        AppError::BadRequest("Malformed request body".to_string())
    })?;

    let confirmation = service.book_appointment(&user, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": confirmation.message })),
    ))
}
