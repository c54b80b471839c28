use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::query::{Collection, StoreQuery};
use super::{RecordStore, StoreError};
use crate::models::{
    ContactMessage, Listing, ListingPatch, NewContactMessage, NewListing, Profile, Role,
};

const OWNER_CONTACT_COLUMNS: [&str; 3] = ["name", "email", "phone"];

/// Typed calls against the record store, one per view-level need.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn RecordStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Role names assigned to an identity. Unknown names are skipped.
    pub async fn roles_for(&self, user_id: Uuid) -> Result<Vec<Role>, StoreError> {
        let query = StoreQuery::table(Collection::UserRoles)
            .select(&["role"])
            .eq("user_id", user_id.to_string());
        let rows = self.store.select(&query).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row["role"].as_str())
            .filter_map(|name| Role::from_str(name).ok())
            .collect())
    }

    /// Listings open for browsing, newest first.
    pub async fn available_listings(&self) -> Result<Vec<Listing>, StoreError> {
        let query = StoreQuery::table(Collection::Properties)
            .eq("is_available", true)
            .newest_first();
        self.fetch(&query).await
    }

    pub async fn listings_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, StoreError> {
        let query = StoreQuery::table(Collection::Properties)
            .eq("owner_id", owner_id.to_string())
            .newest_first();
        self.fetch(&query).await
    }

    /// Every listing with its owner's display name embedded.
    pub async fn all_listings_with_owner(&self) -> Result<Vec<Listing>, StoreError> {
        let query = StoreQuery::table(Collection::Properties)
            .embed("owner", "owner_id", Collection::Profiles, &["name"])
            .newest_first();
        self.fetch(&query).await
    }

    /// One listing with the owner's contact details embedded.
    pub async fn listing_detail(&self, id: Uuid) -> Result<Listing, StoreError> {
        let query = StoreQuery::table(Collection::Properties)
            .eq("id", id.to_string())
            .embed("owner", "owner_id", Collection::Profiles, &OWNER_CONTACT_COLUMNS)
            .limit(1);
        self.fetch::<Listing>(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("property {}", id)))
    }

    pub async fn insert_listing(&self, listing: &NewListing) -> Result<Listing, StoreError> {
        let row = self
            .store
            .insert(Collection::Properties, encode(listing)?)
            .await?;
        decode(Collection::Properties, row)
    }

    /// Updates a listing only if `owner_id` owns it. An empty result means
    /// nothing matched or the store's policy hid the row; both are reported
    /// as not found.
    pub async fn update_owned_listing(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: &ListingPatch,
    ) -> Result<Listing, StoreError> {
        let query = StoreQuery::table(Collection::Properties)
            .eq("id", id.to_string())
            .eq("owner_id", owner_id.to_string());
        let rows = self.store.update(&query, encode(patch)?).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("property {}", id)))?;
        decode(Collection::Properties, row)
    }

    /// Moderation delete by id alone.
    pub async fn delete_listing(&self, id: Uuid) -> Result<(), StoreError> {
        let query = StoreQuery::table(Collection::Properties).eq("id", id.to_string());
        self.remove(&query, id).await
    }

    pub async fn delete_owned_listing(&self, id: Uuid, owner_id: Uuid) -> Result<(), StoreError> {
        let query = StoreQuery::table(Collection::Properties)
            .eq("id", id.to_string())
            .eq("owner_id", owner_id.to_string());
        self.remove(&query, id).await
    }

    async fn remove(&self, query: &StoreQuery, id: Uuid) -> Result<(), StoreError> {
        let removed = self.store.delete(query).await?;
        if removed.is_empty() {
            return Err(StoreError::NotFound(format!("property {}", id)));
        }
        Ok(())
    }

    pub async fn profiles(&self) -> Result<Vec<Profile>, StoreError> {
        self.fetch(&StoreQuery::table(Collection::Profiles)).await
    }

    pub async fn contacts(&self) -> Result<Vec<ContactMessage>, StoreError> {
        self.fetch(&StoreQuery::table(Collection::Contacts).newest_first())
            .await
    }

    /// Contact messages are write-only for everyone but admins, so nothing
    /// is read back.
    pub async fn insert_contact(&self, message: &NewContactMessage) -> Result<(), StoreError> {
        self.store
            .append(Collection::Contacts, encode(message)?)
            .await
    }

    async fn fetch<T: DeserializeOwned>(&self, query: &StoreQuery) -> Result<Vec<T>, StoreError> {
        let rows = self.store.select(query).await?;
        rows.into_iter()
            .map(|row| decode(query.collection, row))
            .collect()
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::InvalidQuery(e.to_string()))
}

fn decode<T: DeserializeOwned>(collection: Collection, row: Value) -> Result<T, StoreError> {
    serde_json::from_value(row).map_err(|e| StoreError::Decode {
        collection: collection.as_str(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn roles_skip_unknown_names() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store
            .seed(
                Collection::UserRoles,
                vec![
                    json!({ "user_id": user.to_string(), "role": "owner" }),
                    json!({ "user_id": user.to_string(), "role": "superuser" }),
                    json!({ "user_id": Uuid::new_v4().to_string(), "role": "admin" }),
                ],
            )
            .await;
        let repo = Repository::new(Arc::new(store));
        assert_eq!(repo.roles_for(user).await.unwrap(), vec![Role::Owner]);
    }

    #[tokio::test]
    async fn delete_of_missing_listing_is_not_found() {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        let err = repo.delete_listing(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
