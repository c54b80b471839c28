// handlers/public/auth/refresh.rs - POST /auth/refresh

use axum::extract::State;
use serde::Deserialize;

use super::SessionView;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::session::RoleResolver;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /auth/refresh - trade a refresh token for a new session
///
/// Roles are looked up again, so grants made since login take effect.
pub async fn refresh_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> ApiResult<SessionView> {
    if payload.refresh_token.trim().is_empty() {
        return Err(ApiError::validation_error(
            "Refresh token is required",
            Some("refresh_token"),
        ));
    }

    let session = state.backend.auth.refresh(payload.refresh_token.trim()).await?;
    let store = state.backend.store.scoped(Some(&session.access_token));
    let roles = RoleResolver::resolve(store, Some(&session.identity)).await;

    Ok(ApiResponse::success(SessionView::new(session, roles)))
}
