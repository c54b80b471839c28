//! Who is looking, and what they may see.
//!
//! [`SessionState`] is the identity plus derived role flags. The CLI keeps
//! one process-wide [`SessionContext`] that publishes a new state on every
//! sign-in, sign-out and token refresh; the view server resolves a
//! [`Viewer`] once per request. Both answer role checks through
//! [`SessionState::require`], which is a presentation gate only: the record
//! store's policies remain the authority.

pub mod access;
pub mod context;
pub mod roles;
pub mod viewer;

use serde::Serialize;

use crate::models::{Identity, Role, RoleSet};

pub use access::AccessError;
pub use context::{SessionContext, SessionEvent, SessionSnapshot, SessionSubscription};
pub use roles::RoleResolver;
pub use viewer::Viewer;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub roles: RoleSet,
}

impl SessionState {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity, roles: RoleSet) -> Self {
        Self {
            identity: Some(identity),
            roles,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Capability check used for link visibility. Always false without an
    /// identity, whatever the role flags say.
    pub fn can(&self, role: Role) -> bool {
        self.identity.is_some() && self.roles.has(role)
    }

    pub fn require(&self, role: Role) -> Result<&Identity, AccessError> {
        let identity = self
            .identity
            .as_ref()
            .ok_or(AccessError::AuthenticationRequired)?;
        if !self.roles.has(role) {
            return Err(AccessError::Denied(role));
        }
        Ok(identity)
    }
}
