// netsec/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use std::path::Path;

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug netsec run ... to see stage details
    tracing_subscriber::fmt::init();

    let command = Cli::parse().into_command();

    match command {
        Commands::Run { project_dir } => {
            load_dotenv(&project_dir);
            commands::run::execute(project_dir).await?;
        }
        Commands::Clean { project_dir } => {
            load_dotenv(&project_dir);
            commands::clean::execute(project_dir)?;
        }
    }

    Ok(())
}

/// `.env` from the working directory, then from the project directory.
/// Variables already set in the environment always win.
fn load_dotenv(project_dir: &Path) {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = ?path, "Loaded .env");
    }
    let project_env = project_dir.join(".env");
    if project_env.is_file() {
        if let Err(e) = dotenvy::from_path(&project_env) {
            tracing::warn!(path = ?project_env, error = %e, "Ignoring unreadable .env");
        }
    }
}
