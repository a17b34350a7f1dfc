use std::sync::Arc;

use chrono::Duration;
use tracing::{error, info, instrument};

use shared_utils::jwt::{issue_token, TokenSubject};

use crate::models::{IdentityError, LoginRequest, LoginResponse, RegisterRequest, UserId};
use crate::services::credentials::CredentialStore;
use crate::store::UserStore;

/// Registration and login. Stateless over the credential store.
#[derive(Clone)]
pub struct IdentityService {
    credentials: CredentialStore,
    jwt_secret: String,
    session_ttl: Duration,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: impl Into<String>, session_ttl: Duration) -> Self {
        Self {
            credentials: CredentialStore::new(users),
            jwt_secret: jwt_secret.into(),
            session_ttl,
        }
    }

    /// Validates every field before touching the store, then performs exactly one insert.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserId, IdentityError> {
        let input = request.into_input()?;
        let username = input.username.clone();

        let user_id = self.credentials.create(input).await?;

        info!(user_id = %user_id, username = %username, "user_registered");
        Ok(user_id)
    }

    /// Unknown email and wrong password both yield [`IdentityError::InvalidCredentials`].
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, IdentityError> {
        let (email, password) = request.into_credentials()?;

        let Some(user) = self.credentials.find_by_email(&email).await? else {
            self.credentials.verify_unknown(password).await?;
            return Err(IdentityError::InvalidCredentials);
        };

        if !self.credentials.verify(&user, password).await? {
            return Err(IdentityError::InvalidCredentials);
        }

        let user_id = user.id.to_string();
        let subject = TokenSubject {
            user_id: &user_id,
            username: &user.username,
            email: &user.email,
        };

        let token = issue_token(&subject, &self.jwt_secret, self.session_ttl).map_err(|e| {
            error!("Failed to issue session token: {}", e);
            IdentityError::Internal(e)
        })?;

        info!(user_id = %user.id, "user_logged_in");

        Ok(LoginResponse {
            message: "Login successful".to_string(),
            user_id: user.id,
            username: user.username,
            token,
        })
    }
}
