use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{info, instrument, warn};

use crate::auth::dto::{LoginRequest, RegisterRequest, TokenResponse};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::Account;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::response::Envelope;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<Account>>), ApiError> {
    payload.username = payload.username.trim().to_string();
    if let Some(email) = payload.email.as_mut() {
        *email = email.trim().to_lowercase();
    }
    payload.validate()?;

    if Account::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::Conflict("Username already taken".into()));
    }

    let hash = hash_password(&payload.password)?;
    let account = Account::create(
        &state.db,
        &payload.username,
        &hash,
        payload.email.as_deref(),
    )
    .await?;

    info!(account_id = %account.id, username = %account.username, "account registered");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("Account created successfully", account)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<Envelope<TokenResponse>>, ApiError> {
    // Unknown username and wrong password produce the same response so the
    // endpoint cannot be used to enumerate usernames.
    let invalid = || ApiError::Unauthenticated("Invalid credentials".into());

    let account = Account::find_by_username(&state.db, payload.username.trim())
        .await?
        .ok_or_else(|| {
            warn!("login with unknown username");
            invalid()
        })?;

    if !verify_password(&payload.password, &account.password_hash)? {
        warn!(account_id = %account.id, "login with invalid password");
        return Err(invalid());
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(account.id)?;

    info!(account_id = %account.id, "login succeeded");
    Ok(Json(Envelope::data(TokenResponse { token })))
}
