use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = "id, title, description, owner_id, created_at, updated_at";

impl Todo {
    pub async fn create(
        db: &PgPool,
        owner_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Todo, sqlx::Error> {
        let row = sqlx::query_as::<_, Todo>(&format!(
            r#"
            INSERT INTO todos (title, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#,
        ))
        .bind(title)
        .bind(description)
        .bind(owner_id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// The caller's todos in insertion order; todos are private, so the list
    /// is always owner-filtered.
    pub async fn list_by_owner(db: &PgPool, owner_id: Uuid) -> Result<Vec<Todo>, sqlx::Error> {
        let rows = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {COLUMNS} FROM todos WHERE owner_id = $1 ORDER BY created_at ASC"
        ))
        .bind(owner_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Todo>, sqlx::Error> {
        let row =
            sqlx::query_as::<_, Todo>(&format!("SELECT {COLUMNS} FROM todos WHERE id = $1"))
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(row)
    }

    pub async fn update_by_id(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let row = sqlx::query_as::<_, Todo>(&format!(
            r#"
            UPDATE todos
            SET title       = COALESCE($2, title),
                description = COALESCE($3, description),
                updated_at  = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete_by_id(db: &PgPool, id: Uuid) -> Result<Option<Todo>, sqlx::Error> {
        let row = sqlx::query_as::<_, Todo>(&format!(
            "DELETE FROM todos WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}
