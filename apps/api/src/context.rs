use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Duration;
use rand::{distributions::Alphanumeric, Rng};
use tracing::{info, warn};

use appointment_cell::{AppointmentStore, BookingService, InMemoryAppointmentStore, SupabaseAppointmentStore};
use auth_cell::{IdentityService, InMemoryUserStore, SupabaseUserStore, UserStore};
use doctor_cell::{DirectoryService, Doctor, DoctorStore, InMemoryDoctorStore, SupabaseDoctorStore};
use shared_config::AppConfig;

/// Everything a request handler can reach. Built once at startup and dropped
/// after the server stops.
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub identity: Arc<IdentityService>,
    pub directory: Arc<DirectoryService>,
    pub booking: Arc<BookingService>,
}

impl AppContext {
    pub async fn init(mut config: AppConfig) -> Result<Self> {
        let problems = config.validate();
        if !problems.is_empty() {
            bail!("invalid configuration for {}: {}", config.environment, problems.join("; "));
        }

        if config.jwt_secret.is_empty() {
            warn!("JWT_SECRET not set, generating an ephemeral session secret");
            config.jwt_secret = ephemeral_secret();
        }

        if config.is_store_configured() {
            info!("Using Supabase store at {}", config.supabase_url);
            let users = Arc::new(SupabaseUserStore::new(&config));
            let doctors = Arc::new(SupabaseDoctorStore::new(&config));
            let appointments = Arc::new(SupabaseAppointmentStore::new(&config));
            return Ok(Self::from_stores(config, users, doctors, appointments));
        }

        warn!("Store not configured, using in-memory store; data is lost on restart");
        let doctors = match &config.doctors_seed_file {
            Some(path) => InMemoryDoctorStore::from_json_file(path)
                .await
                .with_context(|| format!("loading doctors seed file {}", path))?,
            None => InMemoryDoctorStore::default(),
        };

        Ok(Self::from_stores(
            config,
            Arc::new(InMemoryUserStore::new()),
            Arc::new(doctors),
            Arc::new(InMemoryAppointmentStore::new()),
        ))
    }

    pub fn from_stores(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        doctors: Arc<dyn DoctorStore>,
        appointments: Arc<dyn AppointmentStore>,
    ) -> Self {
        let session_ttl = Duration::hours(config.session_ttl_hours);

        Self {
            identity: Arc::new(IdentityService::new(users, config.jwt_secret.clone(), session_ttl)),
            directory: Arc::new(DirectoryService::new(doctors)),
            booking: Arc::new(BookingService::new(appointments)),
            config: Arc::new(config),
        }
    }

    pub fn in_memory(config: AppConfig, doctors: Vec<Doctor>) -> Self {
        Self::from_stores(
            config,
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryDoctorStore::new(doctors)),
            Arc::new(InMemoryAppointmentStore::new()),
        )
    }

    pub fn shutdown(self) {
        info!("Releasing application context");
        drop(self);
    }
}

fn ephemeral_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
