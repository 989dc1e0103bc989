//! Registration Service Library
//!
//! Registers user accounts: validates the request, enforces email
//! uniqueness, hashes the password and persists the account. Served over
//! HTTP by the `registration-service` binary.

pub mod config;
pub mod http;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use domain::Argon2PasswordHasher;

use crate::config::{RegistrationServiceConfig, StoreBackend};
use crate::http::{create_router, AppState};
use crate::infra::Database;
use crate::repository::{InMemoryUserStore, PostgresUserStore, UserStore};
use crate::service::UserRegistrar;

/// Run the registration service with configuration from the environment.
///
/// `host` and `port` override `REGISTRATION_SERVICE_HOST`/`REGISTRATION_SERVICE_PORT`.
pub async fn run_embedded(
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = RegistrationServiceConfig::from_env().with_listener(host, port);
    run_server_with_config(config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = RegistrationServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Wire the store, hasher and registrar into application state.
///
/// Invalid Argon2 parameters fail here, before the server accepts traffic.
pub async fn build_state(
    config: &RegistrationServiceConfig,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let hashing = &config.hashing;
    let hasher = Arc::new(Argon2PasswordHasher::new(
        hashing.memory_kib,
        hashing.iterations,
        hashing.parallelism,
    )?);
    info!(?hasher, "Password hasher configured");

    let store: Arc<dyn UserStore> = match config.store {
        StoreBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            Arc::new(PostgresUserStore::new(db.get_connection()))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory user store, accounts are lost on exit");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let mut registrar = UserRegistrar::new(store.clone(), hasher);
    if let Some(timeout) = config.registration_timeout {
        registrar = registrar.with_timeout(timeout);
    }

    Ok(AppState::new(Arc::new(registrar), store))
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    config: RegistrationServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(&config).await?;
    let app = create_router(state);

    let addr: SocketAddr = config.service.addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Registration service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
