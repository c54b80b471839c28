#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use rentease::auth::{MemoryAuth, TokenVerifier};
use rentease::backend::Backend;
use rentease::config::AppConfig;
use rentease::store::{Collection, MemoryStore};
use rentease::{app, demo, AppState};

pub use rentease::demo::{ADMIN_EMAIL, DEMO_PASSWORD, OWNER_EMAIL, TENANT_EMAIL};

/// A server with its own freshly seeded in-memory backend, so tests do not
/// see each other's writes.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    pub auth: MemoryAuth,
    pub store: MemoryStore,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let config = AppConfig::development();
        let verifier = TokenVerifier::new(config.backend.jwt_secret.clone())?;
        let store = MemoryStore::new();
        let auth = MemoryAuth::new(verifier.clone(), config.backend.token_expiry_secs)
            .with_profiles(store.clone());
        demo::seed(&auth, &store).await?;

        let state = AppState::new(
            Backend::memory(auth.clone(), store.clone(), verifier),
            config,
        );

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
            auth,
            store,
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    /// Registers another account holding the owner role and signs it in.
    pub async fn add_owner(&self, email: &str, name: &str) -> Result<String> {
        let identity = self.auth.register(email, DEMO_PASSWORD);
        self.store
            .seed(
                Collection::Profiles,
                vec![json!({
                    "id": identity.id.to_string(),
                    "name": name,
                    "email": email,
                    "created_at": "2024-01-01T00:00:00Z"
                })],
            )
            .await;
        self.store
            .seed(
                Collection::UserRoles,
                vec![json!({ "user_id": identity.id.to_string(), "role": "owner" })],
            )
            .await;
        self.token_for(email).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Signs in and returns the whole session payload.
    pub async fn login(&self, email: &str, password: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let payload = res.json::<Value>().await?;
        Ok(payload["data"].clone())
    }

    /// Signs in a demo account and returns its access token.
    pub async fn token_for(&self, email: &str) -> Result<String> {
        let session = self.login(email, DEMO_PASSWORD).await?;
        session["access_token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no access_token")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        Ok((res.status(), res.json::<Value>().await?))
    }

    pub async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, self.url(path)).json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        Ok((res.status(), res.json::<Value>().await?))
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        let mut req = self.client.delete(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        Ok((res.status(), res.json::<Value>().await?))
    }
}

/// Labels of the navigation links in a `nav` payload.
pub fn link_labels(nav: &Value) -> Vec<String> {
    nav["links"]
        .as_array()
        .map(|links| {
            links
                .iter()
                .filter_map(|link| link["label"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
