//! Public library interface for the Habit Tracker API
//!
//! This module exports the server implementation and the public types
//! that can be used by other applications or tests.

use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

// Internal modules
mod actions;
mod api;
mod config;
mod domain;
mod storage;
mod validation;

// Re-export public modules and types
pub use actions::{create_habit, day_view, list_habits, summary, toggle_habit, ActionError};
pub use api::{error::ApiError, router, AppState, Clock};
pub use config::{default_database_path, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use domain::*;
pub use storage::{HabitStorage, SqliteStorage, StorageError};
pub use validation::{
    parse_create_habit, parse_day_date, parse_habit_id, CreateHabitBody, ValidationError,
    ValidationIssue,
};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Habit tracker HTTP server
///
/// Owns the application state (store handle and clock) and the bind
/// configuration.
pub struct HabitTrackerServer {
    state: AppState,
    config: ServerConfig,
}

impl HabitTrackerServer {
    /// Create a new server backed by the SQLite database at `db_path`
    ///
    /// This will initialize the schema if it doesn't already exist.
    pub fn new(db_path: impl AsRef<Path>, config: ServerConfig) -> Result<Self, ServerError> {
        info!("Initializing Habit Tracker with database: {:?}", db_path.as_ref());

        let storage = SqliteStorage::new(db_path)?;
        Self::with_storage(storage, Clock::System, config)
    }

    /// Create a server around an already opened store
    pub fn with_storage(
        storage: SqliteStorage,
        clock: Clock,
        config: ServerConfig,
    ) -> Result<Self, ServerError> {
        // Test database connectivity
        let habits = storage.list_habits()?;
        info!("Found {} existing habits", habits.len());

        Ok(Self {
            state: AppState::new(storage, clock),
            config,
        })
    }

    /// Application state shared with every request (useful for testing)
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve HTTP until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<(), ServerError> {
        let address = self.config.address();
        info!("Binding to {address}");

        let listener = TcpListener::bind(&address).await?;
        info!("HTTP server running on {address}");

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
