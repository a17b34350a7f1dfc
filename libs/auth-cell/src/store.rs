use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{StoreError, SupabaseClient};

use crate::models::{NewUser, User, UserId};

/// Persistence for registered users.
///
/// `create` must be atomic with respect to the three identity keys: when any of
/// `unique_id`, `username` or `email` is already taken the insert fails with
/// [`StoreError::Duplicate`] and nothing is written.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<UserId, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Process-local store used in development and tests.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<UserId, StoreError> {
        // lookup and insert happen under one write guard
        let mut users = self.users.write().await;

        if users.iter().any(|existing| user.collides_with(existing)) {
            return Err(StoreError::Duplicate("users identity key".to_string()));
        }

        let id = Uuid::new_v4();
        users.push(User {
            id,
            unique_id: user.unique_id,
            username: user.username,
            email: user.email,
            phone_no: user.phone_no,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

/// `users` table behind PostgREST. Uniqueness comes from the table's UNIQUE
/// constraints, surfaced by the client as a conflict.
pub struct SupabaseUserStore {
    supabase: SupabaseClient,
}

impl SupabaseUserStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub fn from_client(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl UserStore for SupabaseUserStore {
    async fn create(&self, user: NewUser) -> Result<UserId, StoreError> {
        debug!("Inserting user {}", user.username);

        let row = json!({
            "unique_id": user.unique_id,
            "username": user.username,
            "email": user.email,
            "phone_no": user.phone_no,
            "password_hash": user.password_hash,
        });

        let created: User = self.supabase.insert("users", row).await?;
        Ok(created.id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let path = format!(
            "/rest/v1/users?email=eq.{}&limit=1",
            urlencoding::encode(email)
        );

        let mut rows: Vec<User> = self.supabase.request(Method::GET, &path, None).await?;

        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }
}
