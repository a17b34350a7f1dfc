use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{StoreError, SupabaseClient};

use crate::models::{Appointment, NewAppointment};

/// Insert-only appointment persistence. No uniqueness across slots.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, StoreError>;
}

#[derive(Default)]
pub struct InMemoryAppointmentStore {
    appointments: RwLock<Vec<Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Appointment> {
        self.appointments.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.appointments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.appointments.read().await.is_empty()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        let stored = Appointment {
            id: Uuid::new_v4(),
            user_id: appointment.user_id,
            name: appointment.name,
            email: appointment.email,
            location: appointment.location,
            doctor_id: appointment.doctor_id,
            doctor_name: appointment.doctor_name,
            date: appointment.date,
            time: appointment.time,
            symptoms: appointment.symptoms,
            created_at: Utc::now(),
        };

        self.appointments.write().await.push(stored.clone());
        Ok(stored)
    }
}

pub struct SupabaseAppointmentStore {
    supabase: SupabaseClient,
}

impl SupabaseAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn insert(&self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        debug!("Inserting appointment for user {}", appointment.user_id);

        let row = json!(appointment);
        let stored: Appointment = self.supabase.insert("appointments", row).await?;
        Ok(stored)
    }
}
