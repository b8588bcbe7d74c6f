//! Server configuration

use std::path::{Path, PathBuf};

use tracing::warn;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3333;

/// Where the HTTP server binds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Get the default database path with a fallback strategy
///
/// Tries the home, data and config directories and then the working
/// directory, using the first one that is writable. Falls back to the
/// system temp directory.
pub fn default_database_path() -> std::io::Result<PathBuf> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(".habit_tracker")),
        dirs::data_dir().map(|p| p.join("habit_tracker")),
        dirs::config_dir().map(|p| p.join("habit_tracker")),
        std::env::current_dir().ok().map(|p| p.join(".habit_tracker")),
    ];

    for dir in candidates.iter().flatten() {
        if is_writable_dir(dir) {
            return Ok(dir.join("habits.db"));
        }
    }

    let temp_dir = std::env::temp_dir().join("habit_tracker");
    std::fs::create_dir_all(&temp_dir)?;

    let db_path = temp_dir.join("habits.db");
    warn!("Using temporary directory for database: {}", db_path.display());
    Ok(db_path)
}

fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }

    let marker = dir.join(".test_write");
    if std::fs::write(&marker, "test").is_err() {
        return false;
    }
    let _ = std::fs::remove_file(&marker);
    true
}
