use std::sync::Arc;
use tracing::debug;

use super::{AccessError, RoleResolver, SessionState};
use crate::auth::{AccessToken, AuthError};
use crate::backend::Backend;
use crate::models::{Identity, Role};
use crate::store::{RecordStore, Repository};

/// The caller of one request: resolved identity and roles, plus a store
/// handle that runs as that caller.
#[derive(Clone)]
pub struct Viewer {
    pub state: SessionState,
    pub token: Option<AccessToken>,
    store: Arc<dyn RecordStore>,
}

impl Viewer {
    pub fn anonymous(backend: &Backend) -> Self {
        Self {
            state: SessionState::signed_out(),
            token: None,
            store: backend.store.scoped(None),
        }
    }

    /// Verifies `token` and loads the caller's roles. A token that does not
    /// verify is an error; a role lookup that fails yields no roles.
    pub async fn resolve(backend: &Backend, token: AccessToken) -> Result<Self, AuthError> {
        let identity = match &backend.verifier {
            Some(verifier) => verifier.verify(&token)?,
            None => backend.auth.current_identity(&token).await?,
        };
        debug!("Request from {}", identity.id);

        let store = backend.store.scoped(Some(&token));
        let roles = RoleResolver::resolve(store.clone(), Some(&identity)).await;

        Ok(Self {
            state: SessionState::signed_in(identity, roles),
            token: Some(token),
            store,
        })
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.state.identity.as_ref()
    }

    pub fn require(&self, role: Role) -> Result<&Identity, AccessError> {
        self.state.require(role)
    }

    pub fn repository(&self) -> Repository {
        Repository::new(self.store.clone())
    }
}
