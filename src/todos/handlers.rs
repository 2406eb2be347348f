use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tracing::{info, instrument};

use crate::auth::jwt::AuthUser;
use crate::error::{ensure_owner, parse_id, ApiError};
use crate::extract::ApiJson;
use crate::response::{Envelope, MessageBody};
use crate::state::AppState;
use crate::todos::dto::{CreateTodoRequest, UpdateTodoRequest};
use crate::todos::repo::Todo;

/// Every todo route goes through the gate; todos are private to their owner.
pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", post(create_todo))
        .route("/todos", get(list_todos))
        .route("/todos/:id", get(get_todo))
        .route("/todos/:id", put(update_todo))
        .route("/todos/:id", delete(delete_todo))
}

#[instrument(skip(state, payload))]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    ApiJson(payload): ApiJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Envelope<Todo>>), ApiError> {
    payload.validate()?;
    let todo = Todo::create(
        &state.db,
        account_id,
        payload.title.trim(),
        payload.description.as_deref(),
    )
    .await?;
    info!(todo_id = %todo.id, owner_id = %account_id, "todo created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("Todo created successfully", todo)),
    ))
}

#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<Envelope<Vec<Todo>>>, ApiError> {
    let todos = Todo::list_by_owner(&state.db, account_id).await?;
    Ok(Json(Envelope::data(todos)))
}

/// Read path: a todo owned by someone else reads as absent, so the endpoint
/// cannot be used to probe for other users' todo ids. Mutations still use
/// `ensure_owner` and its 403.
fn owned_view(todo: Option<Todo>, caller: uuid::Uuid) -> Result<Todo, ApiError> {
    match todo {
        Some(todo) if todo.owner_id == caller => Ok(todo),
        _ => Err(ApiError::NotFound("Todo not found".into())),
    }
}

#[instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let id = parse_id(&id)?;
    let todo = owned_view(Todo::find_by_id(&state.db, id).await?, account_id)?;
    Ok(Json(Envelope::data(todo)))
}

#[instrument(skip(state, payload))]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateTodoRequest>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let id = parse_id(&id)?;
    payload.validate()?;

    let existing = Todo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".into()))?;
    ensure_owner(existing.owner_id, account_id)?;

    let todo = Todo::update_by_id(
        &state.db,
        id,
        payload.title.as_deref(),
        payload.description.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Todo not found".into()))?;

    info!(todo_id = %todo.id, "todo updated");
    Ok(Json(Envelope::with_message("Todo updated successfully", todo)))
}

#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = parse_id(&id)?;

    let existing = Todo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".into()))?;
    ensure_owner(existing.owner_id, account_id)?;

    Todo::delete_by_id(&state.db, id).await?;

    info!(todo_id = %id, "todo deleted");
    Ok(Json(MessageBody::new("Todo deleted successfully")))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;

    fn todo_owned_by(owner_id: Uuid) -> Todo {
        Todo {
            id: Uuid::new_v4(),
            title: "sell duplicates".into(),
            description: None,
            owner_id,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn read_of_own_todo_succeeds() {
        let owner = Uuid::new_v4();
        let todo = todo_owned_by(owner);
        assert!(owned_view(Some(todo), owner).is_ok());
    }

    #[test]
    fn read_of_foreign_todo_reads_as_absent() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let err = owned_view(Some(todo_owned_by(owner)), stranger).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn read_of_missing_todo_is_not_found() {
        let err = owned_view(None, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
