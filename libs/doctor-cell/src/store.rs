use std::path::Path;

use async_trait::async_trait;
use reqwest::Method;
use tokio::sync::RwLock;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::{StoreError, SupabaseClient};

use crate::models::Doctor;

/// Read access to the doctor directory. Doctors are maintained outside this service.
#[async_trait]
pub trait DoctorStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Doctor>, StoreError>;
}

#[derive(Default)]
pub struct InMemoryDoctorStore {
    doctors: RwLock<Vec<Doctor>>,
}

impl InMemoryDoctorStore {
    pub fn new(doctors: Vec<Doctor>) -> Self {
        Self {
            doctors: RwLock::new(doctors),
        }
    }

    /// Load a JSON array of doctors, e.g. an export of the `doctors` table.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| StoreError::Unavailable(format!("reading {}: {}", path.display(), e)))?;
        let doctors: Vec<Doctor> = serde_json::from_slice(&raw)
            .map_err(|e| StoreError::Unavailable(format!("parsing {}: {}", path.display(), e)))?;

        info!("Loaded {} doctors from {}", doctors.len(), path.display());
        Ok(Self::new(doctors))
    }
}

#[async_trait]
impl DoctorStore for InMemoryDoctorStore {
    async fn list_all(&self) -> Result<Vec<Doctor>, StoreError> {
        Ok(self.doctors.read().await.clone())
    }
}

pub struct SupabaseDoctorStore {
    supabase: SupabaseClient,
}

impl SupabaseDoctorStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

#[async_trait]
impl DoctorStore for SupabaseDoctorStore {
    async fn list_all(&self) -> Result<Vec<Doctor>, StoreError> {
        debug!("Fetching doctor directory");

        let doctors: Vec<Doctor> = self
            .supabase
            .request(Method::GET, "/rest/v1/doctors?select=id,name,specialty,location&order=name.asc", None)
            .await?;

        Ok(doctors)
    }
}
