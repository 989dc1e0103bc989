//! Registration service configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use common::{parse_env, DatabaseConfig, HashingConfig, ServiceConfig};

/// Account store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(format!("Unknown user store backend: {}", other)),
        }
    }
}

/// Registration service configuration.
#[derive(Debug, Clone, Default)]
pub struct RegistrationServiceConfig {
    /// Listener address (CLI flags override it)
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub hashing: HashingConfig,
    pub store: StoreBackend,
    /// Deadline for one registration call (None = unbounded)
    pub registration_timeout: Option<Duration>,
}

impl RegistrationServiceConfig {
    /// Apply `serve --host/--port` overrides.
    pub fn with_listener(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.service.host = host;
        }
        if let Some(port) = port {
            self.service.port = port;
        }
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = ServiceConfig::default();
        let service = ServiceConfig {
            host: env::var("REGISTRATION_SERVICE_HOST").unwrap_or(defaults.host),
            port: parse_env("REGISTRATION_SERVICE_PORT").unwrap_or(defaults.port),
        };

        let store = match env::var("USER_STORE") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to postgres", e);
                StoreBackend::Postgres
            }),
            Err(_) => StoreBackend::default(),
        };

        Self {
            service,
            database: DatabaseConfig::from_env(),
            hashing: HashingConfig::from_env(),
            store,
            registration_timeout: parse_env::<u64>("REGISTRATION_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
        }
    }
}
