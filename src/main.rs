//! Main entry point for the Habit Tracker API
//!
//! Sets up logging, parses command line arguments, and serves the HTTP API.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use habit_tracker_api::{
    default_database_path, HabitTrackerServer, ServerConfig, DEFAULT_HOST, DEFAULT_PORT,
};

/// Command line arguments for the Habit Tracker API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, env = "HABIT_TRACKER_DATABASE")]
    database: Option<PathBuf>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "HABIT_TRACKER_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind the HTTP server to
    #[arg(short, long, env = "HABIT_TRACKER_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG wins over the command line flags
    let log_level = if args.verbose {
        "trace"
    } else if args.debug {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("habit_tracker_api={log_level},tower_http={log_level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Habit Tracker API");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };
    let server = HabitTrackerServer::new(db_path, config)?;

    server.run().await?;

    info!("Habit Tracker API shutdown complete");
    Ok(())
}
