use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use infrastructure::database::{create_pool, init_db};
use infrastructure::logging::init_logging;
use infrastructure::session::SessionService;
use infrastructure::settings::Settings;
use presentation::AppState;

#[derive(Debug, Parser)]
#[command(name = "quill-server", version, about = "A minimal blog server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Clear the existing data and create new tables.
    InitDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::InitDb => init_db_command().await,
    }
}

async fn serve() -> Result<()> {
    let settings = Settings::from_env()?;
    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database, settings.database_max_connections).await?;
    let sessions = Arc::new(SessionService::new(
        &settings.secret_key,
        settings.session_ttl_seconds,
    ));
    let state = AppState::new(pool, sessions, settings.secure_cookies);

    server::run_http(&settings, state).await
}

async fn init_db_command() -> Result<()> {
    let (database, max_connections) = Settings::database_from_env()?;
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    init_logging(&log_level)?;

    let pool = create_pool(&database, max_connections).await?;
    init_db(&pool).await?;
    pool.close().await;

    println!("Initialized the database.");
    Ok(())
}
