//! Input validation utilities

use serde::Serialize;

/// Message shown when either credential is missing
pub const CREDENTIALS_REQUIRED: &str = "Username and password are required";

/// Login credentials as posted to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Trim both credentials and require each to be non-empty
pub fn validate_credentials(username: &str, password: &str) -> Result<Credentials, String> {
    let username = username.trim();
    let password = password.trim();

    if username.is_empty() || password.is_empty() {
        return Err(CREDENTIALS_REQUIRED.to_string());
    }

    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_are_trimmed() {
        let creds = validate_credentials("  admin ", "\tsecret\n").unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn test_blank_credentials_rejected() {
        for (user, pass) in [("", "secret"), ("admin", ""), ("   ", "secret"), ("admin", "  ")] {
            assert_eq!(
                validate_credentials(user, pass).unwrap_err(),
                CREDENTIALS_REQUIRED
            );
        }
    }
}
