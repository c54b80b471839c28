use async_trait::async_trait;
use reqwest::{Method, Response};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::query::{Collection, StoreQuery};
use super::{RecordStore, StoreError};
use crate::auth::AccessToken;
use crate::backend::client::{error_message, BackendClient};

/// Record store reached over the hosted REST interface (`/rest/v1`).
#[derive(Clone)]
pub struct RestStore {
    client: BackendClient,
    token: Option<AccessToken>,
}

impl RestStore {
    pub fn new(client: BackendClient) -> Self {
        Self { client, token: None }
    }

    fn collection_url(&self, collection: Collection) -> Result<url::Url, StoreError> {
        self.client
            .endpoint(&format!("rest/v1/{}", collection.as_str()))
            .map_err(StoreError::InvalidQuery)
    }

    fn bearer(&self) -> Option<&str> {
        self.token.as_ref().map(AccessToken::as_str)
    }

    async fn rows(response: Response) -> Result<Vec<Value>, StoreError> {
        if !response.status().is_success() {
            let (status, message) = error_message(response).await;
            return Err(StoreError::Rejected { status, message });
        }
        match response.json::<Value>().await? {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(vec![]),
            other => Ok(vec![other]),
        }
    }
}

#[async_trait]
impl RecordStore for RestStore {
    fn scoped(&self, token: Option<&AccessToken>) -> Arc<dyn RecordStore> {
        Arc::new(Self {
            client: self.client.clone(),
            token: token.cloned(),
        })
    }

    async fn select(&self, query: &StoreQuery) -> Result<Vec<Value>, StoreError> {
        let params = query.to_params()?;
        let url = self.collection_url(query.collection)?;
        debug!("select {} {:?}", query.collection.as_str(), params);

        let response = self
            .client
            .request(Method::GET, url, self.bearer())
            .query(&params)
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn insert(&self, collection: Collection, row: Value) -> Result<Value, StoreError> {
        let url = self.collection_url(collection)?;
        debug!("insert into {}", collection.as_str());

        let response = self
            .client
            .request(Method::POST, url, self.bearer())
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Rejected {
                status: 403,
                message: format!("insert into {} returned no row", collection.as_str()),
            })
    }

    async fn append(&self, collection: Collection, row: Value) -> Result<(), StoreError> {
        let url = self.collection_url(collection)?;
        debug!("append to {}", collection.as_str());

        let response = self
            .client
            .request(Method::POST, url, self.bearer())
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            let (status, message) = error_message(response).await;
            Err(StoreError::Rejected { status, message })
        }
    }

    async fn update(&self, query: &StoreQuery, patch: Value) -> Result<Vec<Value>, StoreError> {
        query.validate_scoped()?;
        let url = self.collection_url(query.collection)?;
        debug!("update {} {:?}", query.collection.as_str(), query.filter_params());

        let response = self
            .client
            .request(Method::PATCH, url, self.bearer())
            .header("Prefer", "return=representation")
            .query(&query.filter_params())
            .json(&patch)
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn delete(&self, query: &StoreQuery) -> Result<Vec<Value>, StoreError> {
        query.validate_scoped()?;
        let url = self.collection_url(query.collection)?;
        debug!("delete from {} {:?}", query.collection.as_str(), query.filter_params());

        let response = self
            .client
            .request(Method::DELETE, url, self.bearer())
            .header("Prefer", "return=representation")
            .query(&query.filter_params())
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn health(&self) -> Result<(), StoreError> {
        let url = self.collection_url(Collection::Properties)?;
        let response = self
            .client
            .request(Method::HEAD, url, None)
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            let (status, message) = error_message(response).await;
            Err(StoreError::Rejected { status, message })
        }
    }
}
