use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};
use tracing::{info, instrument, warn};

use crate::auth::jwt::AuthUser;
use crate::auth::repo::Account;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::profile::dto::UpdateProfileRequest;
use crate::response::Envelope;
use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile", put(update_profile))
}

/// Returns the caller's own account; the identity comes from the token, not
/// a route parameter.
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<Envelope<Account>>, ApiError> {
    let account = Account::find_by_id(&state.db, account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".into()))?;
    Ok(Json(Envelope::data(account)))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    ApiJson(mut payload): ApiJson<UpdateProfileRequest>,
) -> Result<Json<Envelope<Account>>, ApiError> {
    if let Some(username) = payload.username.as_mut() {
        *username = username.trim().to_string();
    }
    if let Some(email) = payload.email.as_mut() {
        *email = email.trim().to_lowercase();
    }
    payload.validate()?;

    // Re-check uniqueness when the username changes.
    if let Some(username) = &payload.username {
        if let Some(existing) = Account::find_by_username(&state.db, username).await? {
            if existing.id != account_id {
                warn!(username = %username, "username already taken");
                return Err(ApiError::Conflict("Username already taken".into()));
            }
        }
    }

    let account = Account::update_profile(
        &state.db,
        account_id,
        payload.username.as_deref(),
        payload.email.as_deref(),
        payload.avatar_uri.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Account not found".into()))?;

    info!(account_id = %account.id, "profile updated");
    Ok(Json(Envelope::with_message(
        "Profile updated successfully",
        account,
    )))
}
