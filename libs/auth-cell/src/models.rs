use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;

pub type UserId = Uuid;

/// A registered patient as persisted by the credential store.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub unique_id: String,
    pub username: String,
    pub email: String,
    pub phone_no: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("unique_id", &self.unique_id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone_no", &self.phone_no)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Row handed to a [`crate::store::UserStore`]; the password is already hashed.
#[derive(Clone, Serialize)]
pub struct NewUser {
    pub unique_id: String,
    pub username: String,
    pub email: String,
    pub phone_no: String,
    pub password_hash: String,
}

impl NewUser {
    /// True when any of the three identity keys matches `user`.
    pub fn collides_with(&self, user: &User) -> bool {
        user.unique_id == self.unique_id || user.username == self.username || user.email == self.email
    }
}

/// Validated registration fields with the plaintext password still attached.
#[derive(Clone)]
pub struct UserInput {
    pub unique_id: String,
    pub username: String,
    pub email: String,
    pub phone_no: String,
    pub password: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub unique_id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub password: Option<String>,
}

impl RegisterRequest {
    pub fn into_input(self) -> Result<UserInput, IdentityError> {
        match (
            required(self.unique_id),
            required(self.username),
            required(self.email),
            required(self.phone_no),
            required(self.password),
        ) {
            (Some(unique_id), Some(username), Some(email), Some(phone_no), Some(password)) => Ok(UserInput {
                unique_id,
                username,
                email,
                phone_no,
                password,
            }),
            _ => Err(IdentityError::Validation(ALL_FIELDS_REQUIRED.to_string())),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn into_credentials(self) -> Result<(String, String), IdentityError> {
        match (required(self.email), required(self.password)) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(IdentityError::Validation(ALL_FIELDS_REQUIRED.to_string())),
        }
    }
}

/// Absent and empty count as missing. Whitespace is a value: passwords may
/// legitimately consist of spaces.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required.";

/// Successful login: the session credential plus what the client displays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub user_id: UserId,
    pub username: String,
    pub token: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("user already exists with this ID, username, or email")]
    DuplicateIdentity,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for IdentityError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => IdentityError::DuplicateIdentity,
            StoreError::Unavailable(msg) => IdentityError::StoreUnavailable(msg),
        }
    }
}
