// handlers/public/auth/login.rs - POST /auth/login

use axum::extract::State;
use serde::Deserialize;
use tracing::info;

use super::SessionView;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::session::RoleResolver;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - email and password grant
///
/// ```json
/// { "email": "owner@rentease.test", "password": "..." }
/// ```
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<SessionView> {
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation_error("Email and password are required", None));
    }

    let session = state.backend.auth.sign_in(email, &payload.password).await?;
    let store = state.backend.store.scoped(Some(&session.access_token));
    let roles = RoleResolver::resolve(store, Some(&session.identity)).await;
    info!("Login for {}", session.identity.id);

    Ok(ApiResponse::success(SessionView::new(session, roles)).with_notice("Logged in successfully"))
}
