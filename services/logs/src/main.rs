use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use common::{PanelClient, PanelConfig};
use tracing::info;

mod query;
mod viewer;

use crate::viewer::{LOADING, LogViewer};

#[derive(Debug, Parser)]
#[command(name = "logs")]
#[command(about = "Browse service logs through the admin panel")]
struct Cli {
    /// Backend base URL, overriding configuration
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the services that have logs
    Services,
    /// Show the log lines of one service for one day
    View {
        /// Service to query; defaults to the first listed service
        #[arg(long)]
        service: Option<String>,
        /// Day to query as YYYY-MM-DD; defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Only lines matching this pattern
        #[arg(long, default_value = "")]
        pattern: String,
        /// Maximum number of lines (default 1000)
        #[arg(long, default_value = "")]
        limit: String,
    },
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

    let mut viewer = LogViewer::new(client);
    let loaded = viewer.load().await;
    if loaded.redirect.is_some() {
        return Ok(loaded.report());
    }

    let outcome = match cli.command {
        Commands::Services => {
            if loaded.message.is_error() {
                return Ok(loaded.report());
            }
            for option in &viewer.view().services {
                println!("{}", option.label);
            }
            loaded
        }
        Commands::View {
            service,
            date,
            pattern,
            limit,
        } => {
            let form = viewer.form_mut();
            if let Some(service) = service {
                form.service = service;
            }
            if let Some(date) = date {
                form.date = date;
            }
            form.pattern = pattern;
            form.limit = limit;

            eprintln!("{}", LOADING);
            let outcome = viewer.run_query().await;
            if !viewer.view().output.is_empty() {
                println!("{}", viewer.view().output);
            }
            outcome
        }
    };

    Ok(outcome.report())
}
