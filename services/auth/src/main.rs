use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use common::{PanelClient, PanelConfig};
use tracing::info;

mod session;
mod validation;

use crate::session::SessionManager;

#[derive(Debug, Parser)]
#[command(name = "auth")]
#[command(about = "Log in to the admin panel and manage the stored session")]
struct Cli {
    /// Backend base URL, overriding configuration
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Exchange credentials for a session token
    Login {
        #[arg(long, env = "PANEL_USERNAME", default_value = "")]
        username: String,
        #[arg(long, env = "PANEL_PASSWORD", default_value = "", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Tell whether a session token is stored
    Status,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = PanelConfig::from_env()?.with_base_url(cli.base_url)?;
    common::logging::init(&config.log_level);

    info!("Using backend {}", config.base_url);

    let client = PanelClient::new(&config)?;
    let sessions = SessionManager::new(client);

    let outcome = match cli.command {
        Commands::Login { username, password } => sessions.login(&username, &password).await,
        Commands::Logout => sessions.logout(),
        Commands::Status => sessions.status(),
    };

    Ok(outcome.report())
}
