use serde::Deserialize;

use crate::cartridges::repo::{GameCartridgePatch, NewGameCartridge};
use crate::error::ApiError;

fn valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

fn valid_rating(rating: f64) -> bool {
    rating.is_finite() && (0.0..=5.0).contains(&rating)
}

/// Body for POST /game-cartridges. `ownerId` is deliberately absent: the
/// owner is always the authenticated caller.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCartridgeRequest {
    pub name: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub cartridge_type: String,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub rating: Option<f64>,
}

impl CreateCartridgeRequest {
    pub fn into_new(self) -> Result<NewGameCartridge, ApiError> {
        let mut bad = Vec::new();
        if self.name.trim().is_empty() {
            bad.push("name");
        }
        if !valid_price(self.price) {
            bad.push("price");
        }
        if self.cartridge_type.trim().is_empty() {
            bad.push("type");
        }
        if let Some(rating) = self.rating {
            if !valid_rating(rating) {
                bad.push("rating");
            }
        }
        if !bad.is_empty() {
            return Err(ApiError::invalid_input(&bad));
        }
        Ok(NewGameCartridge {
            name: self.name,
            price: self.price,
            cartridge_type: self.cartridge_type,
            description: self.description,
            photo: self.photo,
            rating: self.rating,
        })
    }
}

/// Body for PUT /game-cartridges/:id; every field optional, absent fields
/// keep their stored values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartridgeRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "type")]
    pub cartridge_type: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub rating: Option<f64>,
}

impl UpdateCartridgeRequest {
    pub fn into_patch(self) -> Result<GameCartridgePatch, ApiError> {
        let mut bad = Vec::new();
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                bad.push("name");
            }
        }
        if let Some(price) = self.price {
            if !valid_price(price) {
                bad.push("price");
            }
        }
        if let Some(kind) = &self.cartridge_type {
            if kind.trim().is_empty() {
                bad.push("type");
            }
        }
        if let Some(rating) = self.rating {
            if !valid_rating(rating) {
                bad.push("rating");
            }
        }
        if !bad.is_empty() {
            return Err(ApiError::invalid_input(&bad));
        }
        Ok(GameCartridgePatch {
            name: self.name,
            price: self.price,
            cartridge_type: self.cartridge_type,
            description: self.description,
            photo: self.photo,
            rating: self.rating,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_accepts_valid_body() {
        let req: CreateCartridgeRequest =
            serde_json::from_str(r#"{"name":"FFX","price":29.99,"type":"RPG"}"#).unwrap();
        let new = req.into_new().unwrap();
        assert_eq!(new.cartridge_type, "RPG");
        assert_eq!(new.price, 29.99);
    }

    #[test]
    fn create_rejects_negative_price() {
        let req: CreateCartridgeRequest =
            serde_json::from_str(r#"{"name":"FFX","price":-1.0,"type":"RPG"}"#).unwrap();
        let err = req.into_new().unwrap_err();
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn create_rejects_out_of_range_rating() {
        let req: CreateCartridgeRequest =
            serde_json::from_str(r#"{"name":"FFX","price":1.0,"type":"RPG","rating":5.5}"#)
                .unwrap();
        assert!(req.into_new().unwrap_err().to_string().contains("rating"));
    }

    #[test]
    fn create_requires_name_and_type() {
        let err = serde_json::from_str::<CreateCartridgeRequest>(r#"{"price":1.0}"#);
        assert!(err.is_err());

        let req: CreateCartridgeRequest =
            serde_json::from_str(r#"{"name":"","price":1.0,"type":" "}"#).unwrap();
        let msg = req.into_new().unwrap_err().to_string();
        assert!(msg.contains("name"));
        assert!(msg.contains("type"));
    }

    #[test]
    fn client_supplied_owner_id_is_ignored() {
        let req: CreateCartridgeRequest = serde_json::from_str(
            r#"{"name":"FFX","price":1.0,"type":"RPG","ownerId":"deadbeef"}"#,
        )
        .unwrap();
        assert!(req.into_new().is_ok());
    }

    #[test]
    fn partial_update_keeps_absent_fields_none() {
        let req: UpdateCartridgeRequest = serde_json::from_str(r#"{"price":10.0}"#).unwrap();
        let patch = req.into_patch().unwrap();
        assert_eq!(patch.price, Some(10.0));
        assert!(patch.name.is_none());
        assert!(patch.cartridge_type.is_none());
        assert!(patch.rating.is_none());
    }

    #[test]
    fn partial_update_validates_provided_fields_only() {
        let req: UpdateCartridgeRequest =
            serde_json::from_str(r#"{"rating":-2.0}"#).unwrap();
        assert!(req.into_patch().unwrap_err().to_string().contains("rating"));
    }
}
