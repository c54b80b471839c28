use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{RoleResolver, SessionState};
use crate::auth::{AccessToken, AuthError, AuthService, AuthSession, SignUp};
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    Initial,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    Restored,
}

/// One published value of the session. `generation` increases with every
/// transition that was started, so a late role lookup can tell it lost.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub state: SessionState,
    pub event: SessionEvent,
    pub generation: u64,
    #[serde(skip)]
    pub session: Option<AuthSession>,
}

impl SessionSnapshot {
    fn initial() -> Self {
        Self {
            state: SessionState::signed_out(),
            event: SessionEvent::Initial,
            generation: 0,
            session: None,
        }
    }
}

/// Process-wide session holder.
///
/// Every auth transition resolves roles and then publishes one snapshot to
/// all subscribers. Transitions may overlap; a snapshot built for an older
/// generation than the one already published is dropped.
pub struct SessionContext {
    auth: Arc<dyn AuthService>,
    store: Arc<dyn RecordStore>,
    tx: watch::Sender<SessionSnapshot>,
    generation: AtomicU64,
}

/// Live view of a [`SessionContext`]. Dropping it unsubscribes.
pub struct SessionSubscription {
    rx: watch::Receiver<SessionSnapshot>,
}

impl SessionSubscription {
    pub fn current(&self) -> SessionSnapshot {
        self.rx.borrow().clone()
    }

    /// Waits for the next published snapshot. `None` once the context is gone.
    pub async fn changed(&mut self) -> Option<SessionSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn unsubscribe(self) {}
}

impl SessionContext {
    pub fn new(auth: Arc<dyn AuthService>, store: Arc<dyn RecordStore>) -> Self {
        let (tx, _) = watch::channel(SessionSnapshot::initial());
        Self {
            auth,
            store,
            tx,
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn current(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.tx
            .borrow()
            .session
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    /// Store handle acting as the current caller.
    pub fn store(&self) -> Arc<dyn RecordStore> {
        self.store.scoped(self.access_token().as_ref())
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionSnapshot, AuthError> {
        let session = self.auth.sign_in(email, password).await?;
        info!("Signed in as {}", session.identity.id);
        Ok(self.transition(SessionEvent::SignedIn, Some(session)).await)
    }

    /// Registers an account. Publishes a signed-in snapshot only when the
    /// auth service issued a session straight away.
    pub async fn sign_up(&self, request: &SignUp) -> Result<Option<SessionSnapshot>, AuthError> {
        match self.auth.sign_up(request).await? {
            Some(session) => Ok(Some(self.transition(SessionEvent::SignedIn, Some(session)).await)),
            None => {
                info!("Sign-up for {} awaits confirmation", request.email);
                Ok(None)
            }
        }
    }

    /// Always ends signed out locally, even when the auth service could not
    /// be told.
    pub async fn sign_out(&self) -> SessionSnapshot {
        if let Some(token) = self.access_token() {
            if let Err(e) = self.auth.sign_out(&token).await {
                warn!("Auth service sign-out failed: {}", e);
            }
        }
        self.transition(SessionEvent::SignedOut, None).await
    }

    pub async fn refresh(&self) -> Result<SessionSnapshot, AuthError> {
        let refresh_token = self
            .tx
            .borrow()
            .session
            .as_ref()
            .map(|session| session.refresh_token.clone())
            .ok_or_else(|| AuthError::InvalidToken("no active session".to_string()))?;

        match self.auth.refresh(&refresh_token).await {
            Ok(session) => Ok(self.transition(SessionEvent::TokenRefreshed, Some(session)).await),
            Err(e) => {
                warn!("Token refresh failed, signing out: {}", e);
                self.transition(SessionEvent::SignedOut, None).await;
                Err(e)
            }
        }
    }

    /// Adopts a previously saved session. An expired access token is
    /// refreshed once; anything else that fails leaves the context signed out.
    pub async fn restore(&self, saved: AuthSession) -> SessionSnapshot {
        match self.auth.current_identity(&saved.access_token).await {
            Ok(identity) => {
                let session = AuthSession { identity, ..saved };
                self.transition(SessionEvent::Restored, Some(session)).await
            }
            Err(AuthError::InvalidToken(reason)) => {
                debug!("Saved access token rejected ({}), refreshing", reason);
                match self.auth.refresh(&saved.refresh_token).await {
                    Ok(session) => self.transition(SessionEvent::TokenRefreshed, Some(session)).await,
                    Err(e) => {
                        warn!("Saved session could not be refreshed: {}", e);
                        self.transition(SessionEvent::SignedOut, None).await
                    }
                }
            }
            Err(e) => {
                warn!("Saved session could not be verified: {}", e);
                self.transition(SessionEvent::SignedOut, None).await
            }
        }
    }

    async fn transition(&self, event: SessionEvent, session: Option<AuthSession>) -> SessionSnapshot {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let state = match &session {
            Some(session) => {
                let scoped = self.store.scoped(Some(&session.access_token));
                let roles = RoleResolver::resolve(scoped, Some(&session.identity)).await;
                SessionState::signed_in(session.identity.clone(), roles)
            }
            None => SessionState::signed_out(),
        };

        let snapshot = SessionSnapshot {
            state,
            event,
            generation,
            session,
        };

        let mut discarded = None;
        self.tx.send_if_modified(|current| {
            if current.generation < generation {
                *current = snapshot;
                true
            } else {
                discarded = Some(snapshot);
                false
            }
        });
        if let Some(stale) = discarded {
            debug!("Dropped stale session update (generation {})", generation);
            self.revoke_discarded(stale).await;
        }
        self.current()
    }

    /// A session issued for a superseded transition is never published, so
    /// nothing else would sign it out. Left alone when the newer state is the
    /// same user, whose refresh tokens a revocation would also end.
    async fn revoke_discarded(&self, stale: SessionSnapshot) {
        let Some(session) = stale.session else {
            return;
        };
        let same_user = self
            .tx
            .borrow()
            .state
            .identity
            .as_ref()
            .is_some_and(|current| current.id == session.identity.id);
        if same_user {
            return;
        }
        if let Err(e) = self.auth.sign_out(&session.access_token).await {
            warn!("Revoking superseded session for {} failed: {}", session.identity.id, e);
        }
    }
}
