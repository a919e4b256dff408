//! Inline status messages and page navigation
//!
//! Every user action ends in an [`Outcome`]: a [`StatusMessage`] plus, for
//! actions that finish a login or lose the session, a [`Page`] to move to.

use std::fmt;
use std::process::ExitCode;

/// Whether a status message reports success or failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    Info,
    #[default]
    Error,
}

/// Short status line shown after an action
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Error,
        }
    }

    /// Empty message, as shown while an action starts
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error && !self.text.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Pages of the panel, each served by one front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Users,
    Logs,
}

impl Page {
    /// Command that opens the page
    pub fn command(&self) -> &'static str {
        match self {
            Page::Login => "auth login",
            Page::Users => "users list",
            Page::Logs => "logs view",
        }
    }
}

/// Result of one user action: the status line plus an optional navigation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    pub message: StatusMessage,
    pub redirect: Option<Page>,
}

impl Outcome {
    /// Stay on the current page and show `message`
    pub fn stay(message: StatusMessage) -> Self {
        Self {
            message,
            redirect: None,
        }
    }

    /// Show `message` and move to `page`
    pub fn navigate(message: StatusMessage, page: Page) -> Self {
        Self {
            message,
            redirect: Some(page),
        }
    }

    /// The session is gone; back to the login page
    pub fn session_lost() -> Self {
        Self::navigate(StatusMessage::error("401: unauthorized"), Page::Login)
    }

    pub fn is_login_redirect(&self) -> bool {
        self.redirect == Some(Page::Login)
    }

    /// Print the outcome and turn it into a process exit code
    ///
    /// Informational messages go to stdout, errors and redirects to stderr.
    /// Exit codes: 0 for success, 1 for an error message, 2 when a lost or
    /// missing session sends the user back to the login page.
    pub fn report(&self) -> ExitCode {
        match self.redirect {
            Some(Page::Login) if self.message.is_empty() || self.message.is_error() => {
                if !self.message.is_empty() {
                    eprintln!("{}", self.message);
                }
                eprintln!("Not authenticated. Run `{}` first.", Page::Login.command());
                ExitCode::from(2)
            }
            Some(page) => {
                if !self.message.is_empty() {
                    println!("{}", self.message);
                }
                println!("Next: {}", page.command());
                ExitCode::SUCCESS
            }
            None if self.message.is_error() => {
                eprintln!("{}", self.message);
                ExitCode::FAILURE
            }
            None => {
                if !self.message.is_empty() {
                    println!("{}", self.message);
                }
                ExitCode::SUCCESS
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleared_message_is_not_an_error() {
        let msg = StatusMessage::cleared();
        assert!(msg.is_empty());
        assert!(!msg.is_error());
    }

    #[test]
    fn kinds() {
        assert!(StatusMessage::error("boom").is_error());
        assert!(!StatusMessage::info("ok").is_error());
        assert_eq!(StatusMessage::info("ok").to_string(), "ok");
    }

    #[test]
    fn session_lost_redirects_to_login() {
        let outcome = Outcome::session_lost();
        assert!(outcome.is_login_redirect());
        assert!(outcome.message.is_error());
        assert!(!Outcome::stay(StatusMessage::info("ok")).is_login_redirect());
    }

    #[test]
    fn page_commands() {
        assert_eq!(Page::Login.command(), "auth login");
        assert_eq!(Page::Users.command(), "users list");
        assert_eq!(Page::Logs.command(), "logs view");
    }
}
