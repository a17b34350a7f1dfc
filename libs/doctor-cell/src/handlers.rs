use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::error;

use shared_models::error::AppError;

use crate::models::{Doctor, DirectoryError};
use crate::services::DirectoryService;

#[derive(Debug, Default, Deserialize)]
pub struct DoctorListQuery {
    pub location: Option<String>,
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::StoreUnavailable(detail) => {
                error!("Doctor directory unavailable: {}", detail);
                AppError::Internal("Failed to fetch doctor data.".to_string())
            }
        }
    }
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(service): State<Arc<DirectoryService>>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    let doctors = match query.location.as_deref() {
        Some(location) => service.list_by_location(location).await?,
        None => service.list_doctors().await?,
    };

    Ok(Json(doctors))
}

#[axum::debug_handler]
pub async fn list_locations(
    State(service): State<Arc<DirectoryService>>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(service.locations().await?))
}
