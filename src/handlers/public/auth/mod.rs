// handlers/public/auth/mod.rs - session endpoints forwarded to the auth service
//
// The server keeps no session state: tokens go back to the client, which
// sends the access token as a bearer on later requests.

use serde::Serialize;

use crate::auth::{AccessToken, AuthSession};
use crate::models::{Identity, RoleSet};
use crate::nav::Navigation;
use crate::session::SessionState;

pub mod login;
pub mod logout;
pub mod refresh;
pub mod signup;

pub use login::login_post;
pub use logout::logout_post;
pub use refresh::refresh_post;
pub use signup::signup_post;

/// Tokens plus what the client needs to render straight away.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub access_token: AccessToken,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: Identity,
    pub roles: RoleSet,
    pub nav: Navigation,
}

impl SessionView {
    pub fn new(session: AuthSession, roles: RoleSet) -> Self {
        let state = SessionState::signed_in(session.identity.clone(), roles);
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_in: session.expires_in,
            user: session.identity,
            roles,
            nav: Navigation::for_state(&state),
        }
    }
}
