//! Client side of the hosted record store.
//!
//! The store owns persistence and row-level policies; this module only
//! describes calls against it. [`RecordStore`] is the seam: [`rest::RestStore`]
//! talks to the hosted service, [`memory::MemoryStore`] keeps tables in
//! process for local runs and tests.

pub mod memory;
pub mod query;
pub mod repository;
pub mod rest;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::AccessToken;

pub use memory::MemoryStore;
pub use query::{Collection, SortDirection, StoreQuery};
pub use repository::Repository;
pub use rest::RestStore;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to decode {collection} rows: {message}")]
    Decode { collection: &'static str, message: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Generic select/insert/update/delete over named collections.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns a handle whose calls run as the given caller. `None` runs as
    /// the anonymous role.
    fn scoped(&self, token: Option<&AccessToken>) -> Arc<dyn RecordStore>;

    async fn select(&self, query: &StoreQuery) -> Result<Vec<Value>, StoreError>;

    async fn insert(&self, collection: Collection, row: Value) -> Result<Value, StoreError>;

    /// Insert that does not read the row back, for collections the caller
    /// may write but not read.
    async fn append(&self, collection: Collection, row: Value) -> Result<(), StoreError> {
        self.insert(collection, row).await.map(|_| ())
    }

    /// Applies `patch` to every row matched by the query's filters and
    /// returns the updated rows.
    async fn update(&self, query: &StoreQuery, patch: Value) -> Result<Vec<Value>, StoreError>;

    /// Removes every row matched by the query's filters and returns them.
    async fn delete(&self, query: &StoreQuery) -> Result<Vec<Value>, StoreError>;

    async fn health(&self) -> Result<(), StoreError>;
}
