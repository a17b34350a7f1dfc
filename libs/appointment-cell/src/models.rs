// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;

/// A persisted booking. `user_id` is the authenticated caller, never a value
/// taken from the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub location: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub symptoms: String,
    pub created_at: DateTime<Utc>,
}

/// Intake form as submitted by the client. Fields are stored as supplied:
/// the doctor reference is not checked against the directory, and `date`/`time`
/// are not checked against working hours.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookAppointmentRequest {
    #[serde(deserialize_with = "form_text")]
    pub name: String,
    #[serde(deserialize_with = "form_text")]
    pub email: String,
    #[serde(deserialize_with = "form_text")]
    pub location: String,
    #[serde(deserialize_with = "form_text")]
    pub doctor_id: String,
    #[serde(deserialize_with = "form_text")]
    pub doctor_name: String,
    #[serde(deserialize_with = "form_text")]
    pub date: String,
    #[serde(deserialize_with = "form_text")]
    pub time: String,
    #[serde(deserialize_with = "form_text")]
    pub symptoms: String,
}

/// `null` reads as empty; numbers and booleans keep their JSON text.
fn form_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(de::Error::custom(format!("expected text, found {}", other))),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub location: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub symptoms: String,
}

impl NewAppointment {
    pub fn from_request(user_id: &str, request: BookAppointmentRequest) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: request.name,
            email: request.email,
            location: request.location,
            doctor_id: request.doctor_id,
            doctor_name: request.doctor_name,
            date: request.date,
            time: request.time,
            symptoms: request.symptoms,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub message: String,
    pub appointment: Appointment,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("no authenticated identity")]
    Unauthorized,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        BookingError::StoreUnavailable(err.to_string())
    }
}
