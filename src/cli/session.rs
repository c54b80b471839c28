use anyhow::Context;
use tracing::debug;

use super::config::{clear_session, load_session, save_session};
use crate::backend::Backend;
use crate::config::config;
use crate::session::{SessionContext, SessionSnapshot, SessionState};
use crate::store::Repository;

/// The CLI's process-wide session: a [`SessionContext`] restored from, and
/// written back to, the session file.
pub struct CliSession {
    context: SessionContext,
}

impl CliSession {
    pub async fn open() -> anyhow::Result<Self> {
        let config = config();
        config.validate().context("invalid configuration")?;
        let backend = Backend::from_config(&config.backend).await?;
        let context = SessionContext::new(backend.auth.clone(), backend.store.clone());

        let session = Self { context };
        if let Some(saved) = load_session()? {
            debug!("Restoring saved session for {}", saved.identity.id);
            let snapshot = session.context.restore(saved).await;
            session.persist(&snapshot)?;
        }
        Ok(session)
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn state(&self) -> SessionState {
        self.context.current().state
    }

    /// Store calls run as the signed-in user, or anonymously.
    pub fn repository(&self) -> Repository {
        Repository::new(self.context.store())
    }

    /// Writes the snapshot's tokens to disk, or removes the file when the
    /// snapshot is signed out.
    pub fn persist(&self, snapshot: &SessionSnapshot) -> anyhow::Result<()> {
        match &snapshot.session {
            Some(session) => save_session(session),
            None => clear_session(),
        }
    }
}
