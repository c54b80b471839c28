// handlers/public/auth/logout.rs - POST /auth/logout (bearer required)

use axum::{extract::State, Extension};
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::nav::Navigation;
use crate::session::{SessionState, Viewer};

/// POST /auth/logout - revoke the bearer's session
///
/// Answers with the signed-out navigation so clients drop role links at once.
pub async fn logout_post(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> ApiResult<Navigation> {
    let token = viewer.token.as_ref().ok_or_else(ApiError::authentication_required)?;

    if let Err(e) = state.backend.auth.sign_out(token).await {
        warn!("Auth service sign-out failed: {}", e);
        return Err(e.into());
    }
    if let Some(identity) = viewer.identity() {
        info!("Logout for {}", identity.id);
    }

    Ok(ApiResponse::success(Navigation::for_state(&SessionState::signed_out()))
        .with_notice("Logged out successfully"))
}
