use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::jwt::{Claims, TokenVerifier};
use super::{AccessToken, AuthError, AuthService, AuthSession, SignUp};
use crate::models::Identity;
use crate::store::{Collection, MemoryStore, RecordStore};

struct Account {
    id: Uuid,
    password: String,
}

#[derive(Default)]
struct Accounts {
    by_email: HashMap<String, Account>,
    refresh_tokens: HashMap<String, Uuid>,
}

/// In-process auth service issuing real HS256 tokens.
///
/// Signing up also writes the matching `profiles` row when a store is
/// attached, the way the hosted backend does with its sign-up hook.
#[derive(Clone)]
pub struct MemoryAuth {
    verifier: TokenVerifier,
    expiry_secs: i64,
    accounts: Arc<Mutex<Accounts>>,
    profiles: Option<MemoryStore>,
}

impl MemoryAuth {
    pub fn new(verifier: TokenVerifier, expiry_secs: i64) -> Self {
        Self {
            verifier,
            expiry_secs,
            accounts: Arc::new(Mutex::new(Accounts::default())),
            profiles: None,
        }
    }

    pub fn with_profiles(mut self, store: MemoryStore) -> Self {
        self.profiles = Some(store);
        self
    }

    /// Registers an account without touching profiles. Used for seeding.
    pub fn register(&self, email: &str, password: &str) -> Identity {
        self.register_as(Uuid::new_v4(), email, password)
    }

    /// Same as [`register`](MemoryAuth::register) with a caller-chosen id.
    pub fn register_as(&self, id: Uuid, email: &str, password: &str) -> Identity {
        self.lock().by_email.insert(
            email.to_ascii_lowercase(),
            Account {
                id,
                password: password.to_string(),
            },
        );
        Identity::new(id, Some(email.to_string()))
    }

    /// Refresh tokens not yet used or revoked.
    pub fn refresh_token_count(&self) -> usize {
        self.lock().refresh_tokens.len()
    }

    fn lock(&self) -> MutexGuard<'_, Accounts> {
        // A poisoned lock only means a panicking test thread; the map is still usable.
        self.accounts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn issue(&self, identity: Identity) -> Result<AuthSession, AuthError> {
        let access_token = self.verifier.issue(&Claims::new(&identity, self.expiry_secs))?;
        let refresh_token = Uuid::new_v4().simple().to_string();
        self.lock()
            .refresh_tokens
            .insert(refresh_token.clone(), identity.id);
        Ok(AuthSession {
            access_token,
            refresh_token,
            expires_in: self.expiry_secs,
            identity,
        })
    }

    fn identity_for(&self, id: Uuid) -> Option<Identity> {
        self.lock()
            .by_email
            .iter()
            .find(|(_, account)| account.id == id)
            .map(|(email, account)| Identity::new(account.id, Some(email.clone())))
    }
}

#[async_trait]
impl AuthService for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let identity = {
            let accounts = self.lock();
            let key = email.to_ascii_lowercase();
            match accounts.by_email.get(&key) {
                Some(account) if account.password == password => {
                    Identity::new(account.id, Some(key))
                }
                _ => return Err(AuthError::InvalidCredentials),
            }
        };
        self.issue(identity)
    }

    async fn sign_up(&self, request: &SignUp) -> Result<Option<AuthSession>, AuthError> {
        if self.lock().by_email.contains_key(&request.email.to_ascii_lowercase()) {
            return Err(AuthError::AlreadyRegistered(request.email.clone()));
        }
        let identity = self.register(&request.email, &request.password);

        if let Some(store) = &self.profiles {
            store
                .insert(
                    Collection::Profiles,
                    json!({
                        "id": identity.id.to_string(),
                        "name": request.name,
                        "email": request.email,
                        "phone": request.phone,
                    }),
                )
                .await
                .map_err(|e| AuthError::Rejected {
                    status: 500,
                    message: e.to_string(),
                })?;
        }

        self.issue(identity).map(Some)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let user_id = self
            .lock()
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| AuthError::InvalidToken("unknown refresh token".to_string()))?;
        let identity = self
            .identity_for(user_id)
            .ok_or_else(|| AuthError::InvalidToken("account no longer exists".to_string()))?;
        self.issue(identity)
    }

    async fn current_identity(&self, token: &AccessToken) -> Result<Identity, AuthError> {
        self.verifier.verify(token)
    }

    /// Revokes every refresh token of the caller. Access tokens stay valid
    /// until they expire, as with the hosted service.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthError> {
        let identity = self.verifier.verify(token)?;
        self.lock()
            .refresh_tokens
            .retain(|_, user_id| *user_id != identity.id);
        Ok(())
    }
}
