use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, error};

use crate::models::{IdentityError, NewUser, User, UserId, UserInput};
use crate::services::password::PasswordHasherService;
use crate::store::UserStore;

/// Owns password hashing on top of a [`UserStore`]. Plaintext passwords enter
/// here and never reach the store.
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserStore>,
    decoy_hash: Arc<OnceCell<String>>,
}

const DECOY_PASSWORD: &str = "no-such-user";

impl CredentialStore {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub async fn create(&self, input: UserInput) -> Result<UserId, IdentityError> {
        let UserInput { unique_id, username, email, phone_no, password } = input;

        let password_hash = tokio::task::spawn_blocking(move || PasswordHasherService::hash_password(&password))
            .await
            .map_err(|e| IdentityError::Internal(e.to_string()))?
            .map_err(|e| {
                error!("Password hashing failed: {}", e);
                IdentityError::Internal("password hashing failed".to_string())
            })?;

        let new_user = NewUser {
            unique_id,
            username,
            email,
            phone_no,
            password_hash,
        };

        let id = self.users.create(new_user).await?;
        debug!("Stored credentials for user {}", id);
        Ok(id)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError> {
        Ok(self.users.find_by_email(email).await?)
    }

    /// A stored hash that cannot be parsed counts as a mismatch.
    pub async fn verify(&self, user: &User, password: String) -> Result<bool, IdentityError> {
        let hash = user.password_hash.clone();
        let user_id = user.id;

        let verified = tokio::task::spawn_blocking(move || PasswordHasherService::verify_password(&password, &hash))
            .await
            .map_err(|e| IdentityError::Internal(e.to_string()))?;

        Ok(verified.unwrap_or_else(|e| {
            error!("Stored password hash for user {} is unreadable: {}", user_id, e);
            false
        }))
    }

    /// Burns one Argon2 verification for a login whose email matched nobody,
    /// so that path takes as long as a wrong password.
    pub async fn verify_unknown(&self, password: String) -> Result<(), IdentityError> {
        let hash = self
            .decoy_hash
            .get_or_try_init(|| async {
                tokio::task::spawn_blocking(|| PasswordHasherService::hash_password(DECOY_PASSWORD))
                    .await
                    .map_err(|e| IdentityError::Internal(e.to_string()))?
                    .map_err(|e| IdentityError::Internal(e.to_string()))
            })
            .await?
            .clone();

        tokio::task::spawn_blocking(move || PasswordHasherService::verify_password(&password, &hash))
            .await
            .map_err(|e| IdentityError::Internal(e.to_string()))?
            .map_err(|e| IdentityError::Internal(e.to_string()))?;

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn decoy_ready(&self) -> bool {
        self.decoy_hash.initialized()
    }
}
