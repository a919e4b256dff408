//! User administration: the users table, its row actions and the create form
//!
//! Every action ends with the table fully replaced from the server, never
//! patched locally, and with a single status message describing the result.

use common::{ClientError, Outcome, PanelClient, StatusMessage, Upstream};
use tracing::{error, info, warn};

use crate::models::{QrStatus, SendQrRequest, User, UserForm};

pub const USERS_PATH: &str = "/api/users";
pub const LOGIN_QR_PATH: &str = "/loginqr";

pub const USER_CREATED: &str = "User created";
pub const USER_DELETED: &str = "User deleted";
pub const SESSION_ALREADY_CONNECTED: &str = "Session already connected";
pub const NO_GATEWAY_USER: &str = "No gateway user found for that phone";
pub const GENERIC_CONFLICT: &str = "Conflict: phone/email already registered";
const LIST_FAILED: &str = "Error listing users";
const CREATE_FAILED: &str = "Error creating user";

/// What the users page currently shows
#[derive(Debug, Clone, Default)]
pub struct UsersView {
    /// Rendered table rows
    pub rows: Vec<User>,
    /// Status line under the table
    pub message: StatusMessage,
    /// Create form contents
    pub form: UserForm,
}

/// User administration page
pub struct UserAdmin {
    client: PanelClient,
    view: UsersView,
}

impl UserAdmin {
    pub fn new(client: PanelClient) -> Self {
        Self {
            client,
            view: UsersView::default(),
        }
    }

    pub fn view(&self) -> &UsersView {
        &self.view
    }

    pub fn form_mut(&mut self) -> &mut UserForm {
        &mut self.view.form
    }

    /// Reload the table from the server
    pub async fn refresh(&mut self) -> Outcome {
        self.view.rows.clear();
        self.view.message = StatusMessage::cleared();

        let outcome = match self
            .client
            .get_json::<Vec<User>>(Upstream::Api, USERS_PATH)
            .await
        {
            Ok(users) => {
                info!("Listed {} users", users.len());
                self.view.rows = users;
                Outcome::default()
            }
            Err(e) => failure(e, LIST_FAILED),
        };

        self.finish(outcome)
    }

    /// Submit the create form
    pub async fn create(&mut self) -> Outcome {
        self.view.message = StatusMessage::cleared();

        let request = match self.view.form.validate() {
            Ok(request) => request,
            Err(msg) => return self.finish(Outcome::stay(StatusMessage::error(msg))),
        };

        info!("Creating user with phone {}", request.phone);

        match self
            .client
            .post_json(Upstream::Api, USERS_PATH, &request)
            .await
        {
            Ok(_) => {
                self.view.form.reset();
                self.refreshed_with(StatusMessage::info(USER_CREATED)).await
            }
            Err(e @ ClientError::Http { status: 409, .. }) => {
                warn!("User creation conflict: {}", e);
                self.finish(Outcome::stay(StatusMessage::error(conflict_message(&e))))
            }
            Err(e) => self.finish(failure(e, CREATE_FAILED)),
        }
    }

    /// Delete the user with `id` and reload the table
    pub async fn delete(&mut self, id: i64) -> Outcome {
        self.view.message = StatusMessage::cleared();

        match self
            .client
            .delete(Upstream::Api, &format!("{}/{}", USERS_PATH, id))
            .await
        {
            Ok(_) => {
                info!("Deleted user {}", id);
                self.refreshed_with(StatusMessage::info(USER_DELETED)).await
            }
            Err(e) => self.finish(failure(e, "")),
        }
    }

    /// Ask the gateway to send a QR login message to `phone`
    pub async fn send_qr(&mut self, phone: &str) -> Outcome {
        self.view.message = StatusMessage::cleared();

        let request = SendQrRequest {
            to: phone.to_string(),
        };
        let result = self
            .client
            .post_json(Upstream::Gateway, LOGIN_QR_PATH, &request)
            .await;

        let outcome = match result {
            Ok(payload) => match QrStatus::from_payload(payload) {
                QrStatus::Sent { email } => {
                    info!("QR sent for {}", phone);
                    Outcome::stay(StatusMessage::info(format!("QR sent to {}", email)))
                }
                QrStatus::AlreadyConnected => {
                    Outcome::stay(StatusMessage::info(SESSION_ALREADY_CONNECTED))
                }
                QrStatus::Unexpected(body) => {
                    warn!("Unexpected gateway response: {}", body);
                    Outcome::stay(StatusMessage::error(format!(
                        "Unexpected response: {}",
                        body
                    )))
                }
            },
            Err(e) if e.is_status(404) => Outcome::stay(StatusMessage::error(NO_GATEWAY_USER)),
            Err(e) => failure(e, ""),
        };

        self.finish(outcome)
    }

    /// Reload the table after a successful change, then report `message`
    async fn refreshed_with(&mut self, message: StatusMessage) -> Outcome {
        let outcome = self.refresh().await;
        if outcome.redirect.is_some() || outcome.message.is_error() {
            return outcome;
        }
        self.finish(Outcome::stay(message))
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.view.message = outcome.message.clone();
        outcome
    }
}

/// Turn a failed call into the message for the action that triggered it
fn failure(err: ClientError, fallback: &str) -> Outcome {
    match err {
        ClientError::Unauthorized => Outcome::session_lost(),
        e => {
            error!("Users action failed: {}", e);
            let text = e.to_string();
            if text.trim().is_empty() {
                Outcome::stay(StatusMessage::error(fallback))
            } else {
                Outcome::stay(StatusMessage::error(text))
            }
        }
    }
}

/// Message for a 409: the server's explanation, or a generic one
fn conflict_message(err: &ClientError) -> String {
    match err {
        ClientError::Http { body, .. } if !body.is_empty() => body.clone(),
        _ => GENERIC_CONFLICT.to_string(),
    }
}
