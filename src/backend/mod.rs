pub mod client;

use std::sync::Arc;
use tracing::info;

use crate::auth::{AuthService, MemoryAuth, RestAuth, TokenVerifier};
use crate::config::{BackendConfig, BackendMode};
use crate::store::{MemoryStore, RecordStore, RestStore};

pub use client::BackendClient;

/// The two external collaborators every view talks to.
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn AuthService>,
    pub store: Arc<dyn RecordStore>,
    /// Local verifier when the auth secret is known; otherwise tokens are
    /// checked by asking the auth service.
    pub verifier: Option<TokenVerifier>,
}

impl Backend {
    pub async fn from_config(config: &BackendConfig) -> anyhow::Result<Self> {
        let verifier = if config.jwt_secret.is_empty() {
            None
        } else {
            Some(TokenVerifier::new(config.jwt_secret.clone())?)
        };

        match config.mode {
            BackendMode::Remote => {
                let client = BackendClient::new(config).map_err(anyhow::Error::msg)?;
                info!("Using hosted backend at {}", config.url);
                Ok(Self {
                    auth: Arc::new(RestAuth::new(client.clone())),
                    store: Arc::new(RestStore::new(client)),
                    verifier,
                })
            }
            BackendMode::Memory => {
                let verifier = verifier
                    .ok_or_else(|| anyhow::anyhow!("memory backend needs BACKEND_JWT_SECRET"))?;
                let store = MemoryStore::new();
                let auth = MemoryAuth::new(verifier.clone(), config.token_expiry_secs)
                    .with_profiles(store.clone());
                crate::demo::seed(&auth, &store).await?;
                info!("Using in-memory backend with demo accounts");
                Ok(Self::memory(auth, store, verifier))
            }
        }
    }

    pub fn memory(auth: MemoryAuth, store: MemoryStore, verifier: TokenVerifier) -> Self {
        Self {
            auth: Arc::new(auth),
            store: Arc::new(store),
            verifier: Some(verifier),
        }
    }
}
