use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tracing::{info, instrument};

use crate::auth::jwt::AuthUser;
use crate::cartridges::dto::{CreateCartridgeRequest, UpdateCartridgeRequest};
use crate::cartridges::repo::GameCartridge;
use crate::error::{ensure_owner, parse_id, ApiError};
use crate::extract::ApiJson;
use crate::response::{Envelope, MessageBody};
use crate::state::AppState;

/// List and get are public; create, update, and delete go through the gate.
pub fn cartridge_routes() -> Router<AppState> {
    Router::new()
        .route("/game-cartridges", post(create_cartridge))
        .route("/game-cartridges", get(list_cartridges))
        .route("/game-cartridges/:id", get(get_cartridge))
        .route("/game-cartridges/:id", put(update_cartridge))
        .route("/game-cartridges/:id", delete(delete_cartridge))
}

#[instrument(skip(state, payload))]
pub async fn create_cartridge(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    ApiJson(payload): ApiJson<CreateCartridgeRequest>,
) -> Result<(StatusCode, Json<Envelope<GameCartridge>>), ApiError> {
    let new = payload.into_new()?;
    let cartridge = GameCartridge::create(&state.db, account_id, new).await?;
    info!(cartridge_id = %cartridge.id, owner_id = %account_id, "cartridge created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Game cartridge created successfully",
            cartridge,
        )),
    ))
}

#[instrument(skip(state))]
pub async fn list_cartridges(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<GameCartridge>>>, ApiError> {
    let cartridges = GameCartridge::find_all(&state.db).await?;
    Ok(Json(Envelope::data(cartridges)))
}

#[instrument(skip(state))]
pub async fn get_cartridge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<GameCartridge>>, ApiError> {
    let id = parse_id(&id)?;
    let cartridge = GameCartridge::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Game cartridge not found".into()))?;
    Ok(Json(Envelope::data(cartridge)))
}

#[instrument(skip(state, payload))]
pub async fn update_cartridge(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateCartridgeRequest>,
) -> Result<Json<Envelope<GameCartridge>>, ApiError> {
    let id = parse_id(&id)?;
    let patch = payload.into_patch()?;

    let existing = GameCartridge::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Game cartridge not found".into()))?;
    ensure_owner(existing.owner_id, account_id)?;

    let cartridge = GameCartridge::update_by_id(&state.db, id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Game cartridge not found".into()))?;

    info!(cartridge_id = %cartridge.id, "cartridge updated");
    Ok(Json(Envelope::with_message(
        "Game cartridge updated successfully",
        cartridge,
    )))
}

#[instrument(skip(state))]
pub async fn delete_cartridge(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = parse_id(&id)?;

    let existing = GameCartridge::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Game cartridge not found".into()))?;
    ensure_owner(existing.owner_id, account_id)?;

    GameCartridge::delete_by_id(&state.db, id).await?;

    info!(cartridge_id = %id, "cartridge deleted");
    Ok(Json(MessageBody::new("Game cartridge deleted successfully")))
}
