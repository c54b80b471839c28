use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{Category, Identity, Listing, ListingPatch, NewListing};
use crate::store::{Repository, StoreError};

pub const SAVE_FAILED: &str = "Failed to save property";
pub const DELETE_FAILED: &str = "Failed to delete property";

const TITLE_MAX: usize = 100;
const LOCATION_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormError {
    /// First rule the draft breaks. Nothing was sent.
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// The store refused or could not be reached. Carries the user-facing
    /// notice; details are logged where the failure happened.
    #[error("{0}")]
    Remote(&'static str),
}

impl FormError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        FormError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Listing form fields exactly as typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    /// Accepts a JSON number too; it is kept as its decimal text.
    #[serde(default, deserialize_with = "rent_text")]
    pub rent: String,
    #[serde(default = "default_category", rename = "type")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "available_by_default")]
    pub is_available: bool,
}

fn default_category() -> String {
    Category::Pg.as_str().to_string()
}

fn available_by_default() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RentInput {
    Text(String),
    Number(serde_json::Number),
}

fn rent_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RentInput::deserialize(deserializer)? {
        RentInput::Text(text) => text,
        RentInput::Number(number) => number.to_string(),
    })
}

impl Default for PropertyDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            location: String::new(),
            rent: String::new(),
            category: default_category(),
            description: String::new(),
            is_available: true,
        }
    }
}

/// A draft that passed every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidListing {
    pub title: String,
    pub location: String,
    pub rent: Decimal,
    pub category: Category,
    pub description: String,
    pub is_available: bool,
}

impl ValidListing {
    pub fn into_new(self, owner_id: Uuid) -> NewListing {
        NewListing {
            title: self.title,
            location: self.location,
            rent: self.rent,
            category: self.category,
            description: self.description,
            is_available: self.is_available,
            owner_id,
        }
    }

    pub fn into_patch(self) -> ListingPatch {
        ListingPatch {
            title: self.title,
            location: self.location,
            rent: self.rent,
            category: self.category,
            description: self.description,
            is_available: Some(self.is_available),
        }
    }
}

fn required_text(
    field: &'static str,
    label: &str,
    value: &str,
    max: usize,
) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::invalid(field, format!("{} is required", label)));
    }
    if value.chars().count() > max {
        return Err(FormError::invalid(
            field,
            format!("{} must be at most {} characters", label, max),
        ));
    }
    Ok(value.to_string())
}

impl PropertyDraft {
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            title: listing.title.clone(),
            location: listing.location.clone(),
            rent: listing.rent.normalize().to_string(),
            category: listing.category.as_str().to_string(),
            description: listing.description.clone(),
            is_available: listing.is_available,
        }
    }

    /// Checks title, location, rent, category and description in that order
    /// and reports the first failure.
    pub fn validate(&self) -> Result<ValidListing, FormError> {
        let title = required_text("title", "Title", &self.title, TITLE_MAX)?;
        let location = required_text("location", "Location", &self.location, LOCATION_MAX)?;

        let rent = Decimal::from_str(self.rent.trim())
            .map_err(|_| FormError::invalid("rent", "Rent must be a number"))?;
        if rent <= Decimal::ZERO {
            return Err(FormError::invalid("rent", "Rent must be positive"));
        }

        let category = Category::from_str(self.category.trim())
            .map_err(|_| FormError::invalid("type", "Type must be one of PG, Flat or Room"))?;

        let description =
            required_text("description", "Description", &self.description, DESCRIPTION_MAX)?;

        Ok(ValidListing {
            title,
            location,
            rent,
            category,
            description,
            is_available: self.is_available,
        })
    }
}

/// Validates `draft` and writes it: an update of `editing` when given,
/// otherwise a new listing owned by `owner`.
pub async fn submit_draft(
    repo: &Repository,
    owner: &Identity,
    editing: Option<Uuid>,
    draft: &PropertyDraft,
) -> Result<Listing, FormError> {
    let valid = draft.validate()?;

    let result = match editing {
        Some(id) => repo.update_owned_listing(id, owner.id, &valid.into_patch()).await,
        None => repo.insert_listing(&valid.into_new(owner.id)).await,
    };

    match result {
        Ok(listing) => {
            info!("Saved property {} for owner {}", listing.id, owner.id);
            Ok(listing)
        }
        Err(e) => {
            error!("Saving property for owner {} failed: {}", owner.id, e);
            Err(FormError::Remote(SAVE_FAILED))
        }
    }
}

/// Add/edit dialog state. The draft survives failed submissions and is
/// reset after a successful one.
#[derive(Debug, Clone, Default)]
pub struct PropertyEditor {
    open: bool,
    editing: Option<Uuid>,
    draft: PropertyDraft,
}

impl PropertyEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_new(&mut self) {
        self.open = true;
        self.editing = None;
        self.draft = PropertyDraft::default();
    }

    pub fn open_edit(&mut self, listing: &Listing) {
        self.open = true;
        self.editing = Some(listing.id);
        self.draft = PropertyDraft::from_listing(listing);
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    pub fn draft(&self) -> &PropertyDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut PropertyDraft {
        &mut self.draft
    }

    pub async fn submit(&mut self, repo: &Repository, owner: &Identity) -> Result<Listing, FormError> {
        let listing = submit_draft(repo, owner, self.editing, &self.draft).await?;
        self.cancel();
        Ok(listing)
    }
}

/// A deletion that has been asked for but not yet confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a delete request does nothing until confirmed and executed"]
pub struct DeleteRequest {
    id: Uuid,
}

/// A deletion the user confirmed. Only this can reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: Uuid,
}

impl DeleteRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }
}

impl ConfirmedDelete {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Removes the listing whoever owns it. For moderation.
    pub async fn execute(self, repo: &Repository) -> Result<(), FormError> {
        self.settle(repo.delete_listing(self.id).await)
    }

    /// Removes the listing only if `owner` owns it; anything else is
    /// reported as a failed delete.
    pub async fn execute_as_owner(self, repo: &Repository, owner: &Identity) -> Result<(), FormError> {
        self.settle(repo.delete_owned_listing(self.id, owner.id).await)
    }

    fn settle(self, result: Result<(), StoreError>) -> Result<(), FormError> {
        match result {
            Ok(()) => {
                info!("Deleted property {}", self.id);
                Ok(())
            }
            Err(e) => {
                error!("Deleting property {} failed: {}", self.id, e);
                Err(FormError::Remote(DELETE_FAILED))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Collection, MemoryStore};
    use std::sync::Arc;

    fn draft() -> PropertyDraft {
        PropertyDraft {
            title: "Sunny room".to_string(),
            location: "Pune".to_string(),
            rent: "6500".to_string(),
            category: "Room".to_string(),
            description: "Near campus".to_string(),
            is_available: true,
        }
    }

    fn field_and_message(err: FormError) -> (&'static str, String) {
        match err {
            FormError::Validation { field, message } => (field, message),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn valid_draft_parses_rent() {
        let valid = draft().validate().unwrap();
        assert_eq!(valid.rent, Decimal::from(6500));
        assert_eq!(valid.category, Category::Room);
    }

    #[test]
    fn negative_rent_is_rejected() {
        let mut d = draft();
        d.rent = "-5".to_string();
        assert_eq!(
            field_and_message(d.validate().unwrap_err()),
            ("rent", "Rent must be positive".to_string())
        );
    }

    #[test]
    fn non_numeric_rent_is_rejected() {
        let mut d = draft();
        d.rent = "six thousand".to_string();
        assert_eq!(
            field_and_message(d.validate().unwrap_err()).1,
            "Rent must be a number"
        );
    }

    #[test]
    fn long_description_is_rejected() {
        let mut d = draft();
        d.description = "x".repeat(600);
        assert_eq!(
            field_and_message(d.validate().unwrap_err()),
            (
                "description",
                "Description must be at most 500 characters".to_string()
            )
        );
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        let mut d = draft();
        d.title = "é".repeat(100);
        assert!(d.validate().is_ok());
        d.title.push('é');
        assert_eq!(field_and_message(d.validate().unwrap_err()).0, "title");
    }

    #[test]
    fn first_failing_field_wins() {
        let d = PropertyDraft {
            title: String::new(),
            rent: "-1".to_string(),
            ..PropertyDraft::default()
        };
        assert_eq!(
            field_and_message(d.validate().unwrap_err()),
            ("title", "Title is required".to_string())
        );
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut d = draft();
        d.category = "House".to_string();
        assert_eq!(field_and_message(d.validate().unwrap_err()).0, "type");
    }

    fn owner() -> Identity {
        Identity::new(Uuid::new_v4(), Some("owner@example.com".to_string()))
    }

    #[tokio::test]
    async fn successful_submit_closes_and_resets() {
        let store = MemoryStore::new();
        let repo = Repository::new(Arc::new(store.clone()));
        let who = owner();

        let mut editor = PropertyEditor::new();
        editor.open_new();
        *editor.draft_mut() = draft();
        let listing = editor.submit(&repo, &who).await.unwrap();

        assert_eq!(listing.owner_id, who.id);
        assert!(!editor.is_open());
        assert_eq!(editor.draft(), &PropertyDraft::default());
        assert_eq!(store.rows(Collection::Properties).await.len(), 1);
    }

    #[tokio::test]
    async fn edit_updates_in_place() {
        let store = MemoryStore::new();
        let repo = Repository::new(Arc::new(store.clone()));
        let who = owner();
        let created = submit_draft(&repo, &who, None, &draft()).await.unwrap();

        let mut editor = PropertyEditor::new();
        editor.open_edit(&created);
        assert_eq!(editor.draft().rent, "6500");
        editor.draft_mut().rent = "7000".to_string();
        editor.draft_mut().is_available = false;
        let updated = editor.submit(&repo, &who).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.rent, Decimal::from(7000));
        assert!(!updated.is_available);
        assert_eq!(store.rows(Collection::Properties).await.len(), 1);
    }

    #[tokio::test]
    async fn failed_submit_keeps_draft() {
        let store = MemoryStore::new();
        store.fail(Collection::Properties).await;
        let repo = Repository::new(Arc::new(store));

        let mut editor = PropertyEditor::new();
        editor.open_new();
        *editor.draft_mut() = draft();
        let err = editor.submit(&repo, &owner()).await.unwrap_err();

        assert_eq!(err, FormError::Remote(SAVE_FAILED));
        assert!(editor.is_open());
        assert_eq!(editor.draft(), &draft());
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_store() {
        let store = MemoryStore::new();
        let repo = Repository::new(Arc::new(store.clone()));
        let mut d = draft();
        d.rent = "-5".to_string();

        assert!(submit_draft(&repo, &owner(), None, &d).await.is_err());
        assert!(store.rows(Collection::Properties).await.is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_removes_only_that_listing() {
        let store = MemoryStore::new();
        let repo = Repository::new(Arc::new(store.clone()));
        let who = owner();
        let keep = submit_draft(&repo, &who, None, &draft()).await.unwrap();
        let gone = submit_draft(&repo, &who, None, &draft()).await.unwrap();

        DeleteRequest::new(gone.id).confirm().execute(&repo).await.unwrap();

        let rows = store.rows(Collection::Properties).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], keep.id.to_string());

        let err = DeleteRequest::new(gone.id).confirm().execute(&repo).await.unwrap_err();
        assert_eq!(err, FormError::Remote(DELETE_FAILED));
    }

    #[tokio::test]
    async fn other_owner_cannot_edit_or_delete() {
        let store = MemoryStore::new();
        let repo = Repository::new(Arc::new(store.clone()));
        let who = owner();
        let listing = submit_draft(&repo, &who, None, &draft()).await.unwrap();
        let intruder = owner();

        let mut hijack = draft();
        hijack.title = "Taken over".to_string();
        let err = submit_draft(&repo, &intruder, Some(listing.id), &hijack)
            .await
            .unwrap_err();
        assert_eq!(err, FormError::Remote(SAVE_FAILED));

        let err = DeleteRequest::new(listing.id)
            .confirm()
            .execute_as_owner(&repo, &intruder)
            .await
            .unwrap_err();
        assert_eq!(err, FormError::Remote(DELETE_FAILED));

        let rows = store.rows(Collection::Properties).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title"], "Sunny room");

        DeleteRequest::new(listing.id)
            .confirm()
            .execute_as_owner(&repo, &who)
            .await
            .unwrap();
        assert!(store.rows(Collection::Properties).await.is_empty());
    }

    #[test]
    fn rent_accepts_json_number_or_text() {
        let numeric: PropertyDraft = serde_json::from_value(serde_json::json!({ "rent": 6500 })).unwrap();
        assert_eq!(numeric.rent, "6500");
        assert_eq!(numeric.validate().unwrap_err(), FormError::invalid("title", "Title is required"));

        let fractional: PropertyDraft = serde_json::from_value(serde_json::json!({ "rent": 6500.5 })).unwrap();
        assert_eq!(fractional.rent, "6500.5");

        let text: PropertyDraft = serde_json::from_value(serde_json::json!({ "rent": " 7000 " })).unwrap();
        assert_eq!(text.rent, " 7000 ");
        assert_eq!(text.category, "PG");
    }
}
