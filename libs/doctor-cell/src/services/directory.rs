use std::sync::Arc;

use tracing::{debug, instrument};

use crate::models::{distinct_locations, filter_by_location, find_by_name, Doctor, DirectoryError};
use crate::store::DoctorStore;

/// Read-only view over the doctor directory. Every call takes a fresh snapshot.
#[derive(Clone)]
pub struct DirectoryService {
    doctors: Arc<dyn DoctorStore>,
}

impl DirectoryService {
    pub fn new(doctors: Arc<dyn DoctorStore>) -> Self {
        Self { doctors }
    }

    #[instrument(skip(self))]
    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DirectoryError> {
        let doctors = self.doctors.list_all().await?;
        debug!("Directory snapshot has {} doctors", doctors.len());
        Ok(doctors)
    }

    pub async fn list_by_location(&self, location: &str) -> Result<Vec<Doctor>, DirectoryError> {
        let doctors = self.list_doctors().await?;
        Ok(filter_by_location(&doctors, location))
    }

    pub async fn locations(&self) -> Result<Vec<String>, DirectoryError> {
        let doctors = self.list_doctors().await?;
        Ok(distinct_locations(&doctors))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Doctor>, DirectoryError> {
        let doctors = self.list_doctors().await?;
        Ok(find_by_name(&doctors, name).cloned())
    }
}
