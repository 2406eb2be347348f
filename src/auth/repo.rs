use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Account record. The password hash never leaves the process.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    pub avatar_uri: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = "id, username, password_hash, email, avatar_uri, created_at, updated_at";

impl Account {
    pub async fn create(
        db: &PgPool,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
    ) -> Result<Account, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO accounts (username, password_hash, email)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#,
        ))
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .fetch_one(db)
        .await?;
        Ok(account)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
        let account =
            sqlx::query_as::<_, Account>(&format!("SELECT {COLUMNS} FROM accounts WHERE id = $1"))
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(account)
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<Account>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {COLUMNS} FROM accounts WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(account)
    }

    /// Partial profile update: absent fields keep their stored values.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        username: Option<&str>,
        email: Option<&str>,
        avatar_uri: Option<&str>,
    ) -> Result<Option<Account>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE accounts
            SET username   = COALESCE($2, username),
                email      = COALESCE($3, email),
                avatar_uri = COALESCE($4, avatar_uri),
                updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(avatar_uri)
        .fetch_optional(db)
        .await?;
        Ok(account)
    }
}
