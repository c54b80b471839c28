//! Navigation shell: the links and session controls a viewer gets.

use serde::Serialize;

use crate::models::Role;
use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

const fn link(label: &'static str, href: &'static str) -> NavLink {
    NavLink { label, href }
}

const PUBLIC_LINKS: [NavLink; 4] = [
    link("Home", "/"),
    link("Properties", "/properties"),
    link("About", "/about"),
    link("Contact", "/contact"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionControls {
    SignedOut { login: NavLink, sign_up: NavLink },
    SignedIn { email: Option<String>, logout: NavLink },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub links: Vec<NavLink>,
    pub session: SessionControls,
}

impl Navigation {
    /// Recomputed from the state on every render, so a role or session
    /// change is reflected immediately.
    pub fn for_state(state: &SessionState) -> Self {
        let mut links = PUBLIC_LINKS.to_vec();
        if state.can(Role::Owner) {
            links.push(link("Dashboard", "/owner/dashboard"));
        }
        if state.can(Role::Admin) {
            links.push(link("Admin", "/admin/dashboard"));
        }

        let session = match &state.identity {
            Some(identity) => SessionControls::SignedIn {
                email: identity.email.clone(),
                logout: link("Logout", "/auth/logout"),
            },
            None => SessionControls::SignedOut {
                login: link("Login", "/auth"),
                sign_up: link("Sign Up", "/auth?mode=signup"),
            },
        };

        Self { links, session }
    }

    pub fn has_link(&self, href: &str) -> bool {
        self.links.iter().any(|l| l.href == href)
    }
}
