use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Game cartridge record. `cartridge_type` is `type` on the wire (the column
/// avoids the SQL keyword).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GameCartridge {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub cartridge_type: String,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub rating: Option<f64>,
    pub owner_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields for a new cartridge, already validated; the owner comes from the
/// authenticated caller, never from the request body.
#[derive(Debug)]
pub struct NewGameCartridge {
    pub name: String,
    pub price: f64,
    pub cartridge_type: String,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub rating: Option<f64>,
}

/// Partial update: `None` leaves the stored value untouched.
#[derive(Debug, Default)]
pub struct GameCartridgePatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub cartridge_type: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub rating: Option<f64>,
}

const COLUMNS: &str = "id, name, price, cartridge_type, description, photo, rating, owner_id, \
                       created_at, updated_at";

impl GameCartridge {
    pub async fn create(
        db: &PgPool,
        owner_id: Uuid,
        new: NewGameCartridge,
    ) -> Result<GameCartridge, sqlx::Error> {
        let row = sqlx::query_as::<_, GameCartridge>(&format!(
            r#"
            INSERT INTO game_cartridges
                (name, price, cartridge_type, description, photo, rating, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#,
        ))
        .bind(&new.name)
        .bind(new.price)
        .bind(&new.cartridge_type)
        .bind(&new.description)
        .bind(&new.photo)
        .bind(new.rating)
        .bind(owner_id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// All cartridges, insertion order. No pagination; the collection is
    /// expected to stay personal-library sized.
    pub async fn find_all(db: &PgPool) -> Result<Vec<GameCartridge>, sqlx::Error> {
        let rows = sqlx::query_as::<_, GameCartridge>(&format!(
            "SELECT {COLUMNS} FROM game_cartridges ORDER BY created_at ASC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<GameCartridge>, sqlx::Error> {
        let row = sqlx::query_as::<_, GameCartridge>(&format!(
            "SELECT {COLUMNS} FROM game_cartridges WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Merges only the provided fields and returns the updated record, or
    /// `None` if no record with that id exists.
    pub async fn update_by_id(
        db: &PgPool,
        id: Uuid,
        patch: GameCartridgePatch,
    ) -> Result<Option<GameCartridge>, sqlx::Error> {
        let row = sqlx::query_as::<_, GameCartridge>(&format!(
            r#"
            UPDATE game_cartridges
            SET name           = COALESCE($2, name),
                price          = COALESCE($3, price),
                cartridge_type = COALESCE($4, cartridge_type),
                description    = COALESCE($5, description),
                photo          = COALESCE($6, photo),
                rating         = COALESCE($7, rating),
                updated_at     = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(patch.price)
        .bind(&patch.cartridge_type)
        .bind(&patch.description)
        .bind(&patch.photo)
        .bind(patch.rating)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete_by_id(db: &PgPool, id: Uuid) -> Result<Option<GameCartridge>, sqlx::Error> {
        let row = sqlx::query_as::<_, GameCartridge>(&format!(
            "DELETE FROM game_cartridges WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_type_and_owner_with_wire_names() {
        let row = GameCartridge {
            id: Uuid::new_v4(),
            name: "FFX".into(),
            price: 29.99,
            cartridge_type: "RPG".into(),
            description: None,
            photo: None,
            rating: Some(4.5),
            owner_id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["type"], "RPG");
        assert!(json.get("ownerId").is_some());
        assert!(json.get("cartridge_type").is_none());
        assert!(json.get("owner_id").is_none());
    }
}
