use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::BackendConfig;

/// Shared HTTP plumbing for the hosted auth service and record store.
///
/// Every request carries the project `apikey`. The bearer is the caller's
/// access token when there is one, otherwise the anon key, so row-level
/// policies always see the real caller.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, String> {
        let mut base = Url::parse(&config.url).map_err(|e| format!("invalid backend url: {}", e))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| format!("failed to build http client: {}", e))?;

        Ok(Self {
            http,
            base,
            api_key: config.anon_key.clone(),
        })
    }

    /// Resolves a path such as `rest/v1/properties` against the project URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, String> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| format!("invalid endpoint '{}': {}", path, e))
    }

    pub fn request(&self, method: Method, url: Url, bearer: Option<&str>) -> RequestBuilder {
        let bearer = bearer.unwrap_or(&self.api_key);
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }
}

/// Pulls a human-readable message out of an error response. The auth
/// service and the record store use different field names for it.
pub async fn error_message(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            ["message", "error_description", "msg", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| if body.is_empty() { format!("HTTP {}", status) } else { body });
    (status, message)
}
