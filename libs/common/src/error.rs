//! Custom error types for the common library
//!
//! This module defines the error taxonomy shared by every front end: network
//! failures, authentication failures, client-side validation, HTTP error
//! statuses and local storage problems.

use std::io;

use thiserror::Error;

/// Custom error type for panel client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered 401; the stored token has already been cleared
    #[error("401: unauthorized")]
    Unauthorized,

    /// A required field was missing before any request was issued
    #[error("{0}")]
    Validation(String),

    /// Any other non-success status
    ///
    /// `message` is the trimmed body, or the reason phrase when the body is
    /// empty; `body` keeps the trimmed body as received.
    #[error("{status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: String,
    },

    /// The response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Reading or writing the token store failed
    #[error("Token storage error: {0}")]
    Storage(#[source] io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// HTTP status carried by the error, if the server produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized => Some(401),
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error came from a response with the given status
    pub fn is_status(&self, code: u16) -> bool {
        self.status() == Some(code)
    }
}

/// Type alias for Result with ClientError
pub type ClientResult<T> = Result<T, ClientError>;
