//! Session management: exchanging credentials for a token and dropping it

use common::{Outcome, Page, PanelClient, StatusMessage};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::validation::validate_credentials;

/// Authentication endpoint
pub const LOGIN_PATH: &str = "/api/login";

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const INVALID_RESPONSE: &str = "Invalid login response";
pub const NETWORK_ERROR: &str = "Network error";
pub const AUTHENTICATED: &str = "Authenticated";

/// Session manager for the locally stored token
#[derive(Clone)]
pub struct SessionManager {
    client: PanelClient,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(client: PanelClient) -> Self {
        Self { client }
    }

    /// Submit the login form
    ///
    /// Blank credentials never reach the network. A successful exchange
    /// stores the token and moves on to the users page.
    pub async fn login(&self, username: &str, password: &str) -> Outcome {
        let credentials = match validate_credentials(username, password) {
            Ok(credentials) => credentials,
            Err(msg) => return Outcome::stay(StatusMessage::error(msg)),
        };

        info!("Login attempt for user: {}", credentials.username);

        let response = match self.client.post_anonymous(LOGIN_PATH, &credentials).await {
            Ok(response) => response,
            Err(e) => {
                error!("Login request failed: {}", e);
                return Outcome::stay(StatusMessage::error(NETWORK_ERROR));
            }
        };

        if !response.status().is_success() {
            warn!(
                "Login rejected for user {}: {}",
                credentials.username,
                response.status()
            );
            return Outcome::stay(StatusMessage::error(INVALID_CREDENTIALS));
        }

        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        let Some(token) = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
        else {
            warn!("Login response carried no token");
            return Outcome::stay(StatusMessage::error(INVALID_RESPONSE));
        };

        if let Err(e) = self.client.tokens().save(token) {
            error!("Failed to persist session token: {}", e);
            return Outcome::stay(StatusMessage::error(e.to_string()));
        }

        info!("User {} authenticated", credentials.username);
        Outcome::navigate(StatusMessage::info(AUTHENTICATED), Page::Users)
    }

    /// Drop the stored token
    pub fn logout(&self) -> Outcome {
        match self.client.tokens().clear() {
            Ok(()) => {
                info!("Session token cleared");
                Outcome::navigate(StatusMessage::info("Logged out"), Page::Login)
            }
            Err(e) => Outcome::stay(StatusMessage::error(e.to_string())),
        }
    }

    /// Report whether a token is stored, without revealing it
    pub fn status(&self) -> Outcome {
        match self.client.tokens().load() {
            Ok(Some(_)) => Outcome::stay(StatusMessage::info(format!(
                "Session token present ({})",
                self.client.tokens().path().display()
            ))),
            Ok(None) => Outcome::stay(StatusMessage::error("No session token stored")),
            Err(e) => Outcome::stay(StatusMessage::error(e.to_string())),
        }
    }
}
