use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Request body for registration. Owner-style fields are never accepted from
/// the client; unknown keys are ignored by serde.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for login: just the identity token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut bad = Vec::new();
        if self.username.trim().is_empty() {
            bad.push("username");
        }
        if self.password.len() < 8 {
            bad.push("password");
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                bad.push("email");
            }
        }
        if bad.is_empty() {
            Ok(())
        } else {
            Err(ApiError::invalid_input(&bad))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_registration() {
        let req = RegisterRequest {
            username: "collector".into(),
            password: "longenough".into(),
            email: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_blank_username_and_short_password() {
        let req = RegisterRequest {
            username: "  ".into(),
            password: "short".into(),
            email: None,
        };
        let err = req.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("username"));
        assert!(msg.contains("password"));
    }

    #[test]
    fn rejects_bad_email_shape() {
        let req = RegisterRequest {
            username: "collector".into(),
            password: "longenough".into(),
            email: Some("not-an-email".into()),
        };
        assert!(req.validate().unwrap_err().to_string().contains("email"));
    }

    #[test]
    fn client_supplied_owner_fields_are_ignored() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"a","password":"longenough","ownerId":"evil","id":"evil"}"#,
        )
        .expect("unknown keys are skipped");
        assert_eq!(req.username, "a");
    }
}
