//! Common library for the admin panel front ends
//!
//! This crate provides the functionality shared by the `auth`, `users` and
//! `logs` front ends: configuration, the error taxonomy, the persisted
//! session token, the authenticated request helper and status reporting.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod token;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use client::{Method, PanelClient, Payload, Upstream};
pub use config::PanelConfig;
pub use error::{ClientError, ClientResult};
pub use message::{MessageKind, Outcome, Page, StatusMessage};
pub use token::TokenStore;

/// Example usage of the request helper
///
/// ```rust,no_run
/// use common::{PanelClient, PanelConfig, Upstream};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = PanelConfig::from_env()?;
///     let client = PanelClient::new(&config)?;
///     let users: serde_json::Value = client.get_json(Upstream::Api, "/api/users").await?;
///     println!("{}", users);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
