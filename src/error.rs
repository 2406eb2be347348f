use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error taxonomy for the HTTP surface. Every variant renders as the same
/// `{message, error?}` envelope; only the status code and message differ.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    InvalidInput {
        message: String,
        detail: Option<String>,
    },
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    pub fn invalid_input(fields: &[&str]) -> Self {
        let fields = fields.join(", ");
        Self::InvalidInput {
            message: format!("Invalid or missing field(s): {fields}"),
            detail: Some(fields),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internal detail goes to the log, never to the client.
        if let ApiError::Internal(ref e) = self {
            error!(error = %e, "internal server error");
        }
        let error = match &self {
            ApiError::InvalidInput { detail, .. } => detail.clone(),
            _ => None,
        };
        let body = ErrorBody {
            message: self.to_string(),
            error,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// A malformed id is indistinguishable from a missing record on the client
/// contract, so it parses straight to 404.
pub fn parse_id(raw: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Record not found".into()))
}

/// Mutation guard: the caller must be the record's owner. A mismatch is 403,
/// distinct from the record not existing at all.
pub fn ensure_owner(owner_id: uuid::Uuid, caller: uuid::Uuid) -> Result<(), ApiError> {
    if owner_id == caller {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Not the owner of this record".into()))
    }
}

/// The only unique constraint a request can trip is the account username;
/// name it so the racy path reads the same as the pre-checked one.
fn conflict_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.contains("username") => "Username already taken",
        _ => "Already exists",
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => ApiError::NotFound("Record not found".into()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                ApiError::Conflict(conflict_message(db.constraint()).into())
            }
            _ => ApiError::Internal(e.into()),
        }
    }
}
