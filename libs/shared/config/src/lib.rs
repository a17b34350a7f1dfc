use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_CLIENT_URLS: &str = "http://localhost:5173,https://health-ease-theta.vercel.app";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Anything other than `production` is treated as development.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Sessions longer than a year are refused at startup.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub port: u16,
    pub environment: Environment,
    pub client_urls: Vec<String>,
    pub analyzer_port: u16,
    pub analyzer_script: String,
    pub analyzer_command: String,
    pub frontend_dist: String,
    pub doctors_seed_file: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            session_ttl_hours: parse_or("SESSION_TTL_HOURS", 24),
            port: parse_or("PORT", 5000),
            environment: env::var("APP_ENV")
                .or_else(|_| env::var("NODE_ENV"))
                .map(|value| Environment::parse(&value))
                .unwrap_or_else(|_| {
                    warn!("APP_ENV not set, using development");
                    Environment::Development
                }),
            client_urls: split_origins(
                &env::var("CLIENT_URLS").unwrap_or_else(|_| DEFAULT_CLIENT_URLS.to_string()),
            ),
            analyzer_port: parse_or("REPORT_ANALYZER_PORT", 5081),
            analyzer_script: env::var("REPORT_ANALYZER_SCRIPT")
                .unwrap_or_else(|_| "report_analyzer/medical_analyzer.py".to_string()),
            analyzer_command: env::var("REPORT_ANALYZER_COMMAND")
                .unwrap_or_else(|_| "streamlit".to_string()),
            frontend_dist: env::var("FRONTEND_DIST")
                .unwrap_or_else(|_| "../Frontend/dist".to_string()),
            doctors_seed_file: env::var("DOCTORS_SEED_FILE").ok(),
        };

        if !config.is_store_configured() {
            warn!("Persistent store not configured - missing environment variables");
        }

        config
    }

    pub fn is_store_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Problems that must stop the server from starting in the current environment.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.session_ttl_hours <= 0 || self.session_ttl_hours > MAX_SESSION_TTL_HOURS {
            problems.push(format!("SESSION_TTL_HOURS must be between 1 and {}", MAX_SESSION_TTL_HOURS));
        }

        if self.is_production() {
            if self.jwt_secret.is_empty() {
                problems.push("JWT_SECRET is required in production".to_string());
            }
            if !self.is_store_configured() {
                problems.push("SUPABASE_URL and SUPABASE_SERVICE_KEY are required in production".to_string());
            }
        }

        problems
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            jwt_secret: String::new(),
            session_ttl_hours: 24,
            port: 5000,
            environment: Environment::Development,
            client_urls: split_origins(DEFAULT_CLIENT_URLS),
            analyzer_port: 5081,
            analyzer_script: "report_analyzer/medical_analyzer.py".to_string(),
            analyzer_command: "streamlit".to_string(),
            frontend_dist: "../Frontend/dist".to_string(),
            doctors_seed_file: None,
        }
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse(" PRODUCTION "), Environment::Production);
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse("staging"), Environment::Development);
    }

    #[test]
    fn test_split_origins() {
        let origins = split_origins(" http://a.test/ , ,https://b.test");
        assert_eq!(origins, vec!["http://a.test", "https://b.test"]);
    }

    #[test]
    fn test_development_tolerates_missing_secrets() {
        assert!(base_config().validate().is_empty());
    }

    #[test]
    fn test_production_requires_secret_and_store() {
        let mut config = base_config();
        config.environment = Environment::Production;
        assert_eq!(config.validate().len(), 2);

        config.jwt_secret = "secret".to_string();
        config.supabase_url = "http://localhost:54321".to_string();
        config.supabase_service_key = "service-key".to_string();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_session_ttl_bounds() {
        let mut config = base_config();
        for hours in [0, -5, MAX_SESSION_TTL_HOURS + 1, 10_000_000_000] {
            config.session_ttl_hours = hours;
            assert_eq!(config.validate().len(), 1, "ttl {} should be refused", hours);
        }

        config.session_ttl_hours = MAX_SESSION_TTL_HOURS;
        assert!(config.validate().is_empty());
    }
}
