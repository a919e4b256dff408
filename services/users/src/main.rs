use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use common::{PanelClient, PanelConfig};
use tracing::info;

mod admin;
mod models;
mod table;

use crate::admin::UserAdmin;
use crate::models::DEFAULT_ROLE;

#[derive(Debug, Parser)]
#[command(name = "users")]
#[command(about = "Manage admin panel users and send QR login messages")]
struct Cli {
    /// Backend base URL, overriding configuration
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show every user
    List,
    /// Register a user and show the refreshed list
    Create {
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = DEFAULT_ROLE)]
        role: String,
    },
    /// Delete a user by id and show the refreshed list
    Delete { id: i64 },
    /// Ask the messaging gateway to send a QR login message
    SendQr { phone: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = PanelConfig::from_env()?.with_base_url(cli.base_url)?;
    common::logging::init(&config.log_level);

    info!("Using backend {}", config.base_url);

    let client = PanelClient::new(&config)?;
    if let Err(outcome) = client.require_session() {
        return Ok(outcome.report());
    }

    let mut admin = UserAdmin::new(client);

    let (outcome, show_table) = match cli.command {
        Commands::List => (admin.refresh().await, true),
        Commands::Create {
            phone,
            email,
            name,
            role,
        } => {
            let form = admin.form_mut();
            form.phone = phone;
            form.email = email;
            form.name = name;
            form.role = role;
            (admin.create().await, true)
        }
        Commands::Delete { id } => (admin.delete(id).await, true),
        Commands::SendQr { phone } => {
            println!("Sending QR to {}...", phone.trim());
            (admin.send_qr(phone.trim()).await, false)
        }
    };

    if show_table && outcome.redirect.is_none() && !outcome.message.is_error() {
        print!("{}", table::render(&admin.view().rows));
    }

    Ok(outcome.report())
}
