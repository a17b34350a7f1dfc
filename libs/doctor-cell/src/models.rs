use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;

/// A bookable practitioner. Serialized with `_id` to match what clients expect;
/// store rows may use either `id` or `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub location: String,
}

/// Doctors whose location contains `query`, ignoring case.
/// An empty query keeps every doctor.
pub fn filter_by_location(doctors: &[Doctor], query: &str) -> Vec<Doctor> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return doctors.to_vec();
    }

    doctors
        .iter()
        .filter(|doctor| doctor.location.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Distinct locations in first-seen order.
pub fn distinct_locations(doctors: &[Doctor]) -> Vec<String> {
    let mut locations: Vec<String> = Vec::new();
    for doctor in doctors {
        if !locations.contains(&doctor.location) {
            locations.push(doctor.location.clone());
        }
    }
    locations
}

pub fn find_by_name<'a>(doctors: &'a [Doctor], name: &str) -> Option<&'a Doctor> {
    doctors.iter().find(|doctor| doctor.name == name)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        DirectoryError::StoreUnavailable(err.to_string())
    }
}
