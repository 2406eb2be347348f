use serde::Deserialize;

use crate::auth::dto::is_valid_email;
use crate::error::ApiError;

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar_uri: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut bad = Vec::new();
        if let Some(username) = &self.username {
            if username.trim().is_empty() {
                bad.push("username");
            }
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
