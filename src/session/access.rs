use thiserror::Error;

use crate::models::Role;

pub const AUTH_ROUTE: &str = "/auth";
pub const HOME_ROUTE: &str = "/";

/// Outcome of a failed page-level role check.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Access denied. {} role required.", role_title(.0))]
    Denied(Role),
}

impl AccessError {
    /// Where the caller should be sent instead.
    pub fn redirect(&self) -> &'static str {
        match self {
            AccessError::AuthenticationRequired => AUTH_ROUTE,
            AccessError::Denied(_) => HOME_ROUTE,
        }
    }
}

fn role_title(role: &Role) -> &'static str {
    match role {
        Role::Tenant => "Tenant",
        Role::Owner => "Owner",
        Role::Admin => "Admin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_notice_names_the_role() {
        assert_eq!(
            AccessError::Denied(Role::Admin).to_string(),
            "Access denied. Admin role required."
        );
        assert_eq!(AccessError::Denied(Role::Owner).redirect(), "/");
        assert_eq!(AccessError::AuthenticationRequired.redirect(), "/auth");
    }
}
