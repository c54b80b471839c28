use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Listing kind. Stored in the `type` column with these exact spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "PG")]
    Pg,
    Flat,
    Room,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Pg, Category::Flat, Category::Room];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pg => "PG",
            Category::Flat => "Flat",
            Category::Room => "Room",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Exact, case-sensitive match against the stored spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown property type '{}'", s))
    }
}

/// Owner profile fields embedded inline into a listing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerContact {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Row of the `properties` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub rent: Decimal,
    #[serde(rename = "type")]
    pub category: Category,
    pub description: String,
    #[serde(default = "available_by_default")]
    pub is_available: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerContact>,
}

fn available_by_default() -> bool {
    true
}

/// Insert payload. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub location: String,
    pub rent: Decimal,
    #[serde(rename = "type")]
    pub category: Category,
    pub description: String,
    pub is_available: bool,
    pub owner_id: Uuid,
}

/// Update payload for an existing listing, scoped by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPatch {
    pub title: String,
    pub location: String,
    pub rent: Decimal,
    #[serde(rename = "type")]
    pub category: Category,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_parse_is_exact() {
        assert_eq!("Flat".parse::<Category>(), Ok(Category::Flat));
        assert_eq!("PG".parse::<Category>(), Ok(Category::Pg));
        assert!("flat".parse::<Category>().is_err());
        assert!("House".parse::<Category>().is_err());
    }

    #[test]
    fn listing_decodes_store_row_with_numeric_rent() {
        let row = json!({
            "id": "7a1f2c1e-3b8e-4f55-9d8a-5b0e6f1c2d3a",
            "title": "Sunny room",
            "location": "Pune",
            "rent": 650.5,
            "type": "Room",
            "description": "Near campus",
            "is_available": false,
            "image_url": null,
            "owner_id": "0b8e1a52-21c4-4c7a-8f0f-2f1c9d8e7a60",
            "created_at": "2024-03-01T10:00:00Z",
            "owner": { "name": "Asha" }
        });
        let listing: Listing = serde_json::from_value(row).unwrap();
        assert_eq!(listing.category, Category::Room);
        assert_eq!(listing.rent, Decimal::new(6505, 1));
        assert!(!listing.is_available);
        assert_eq!(listing.owner.unwrap().name, "Asha");
    }
}
