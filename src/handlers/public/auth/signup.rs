// handlers/public/auth/signup.rs - POST /auth/signup

use axum::{extract::State, http::StatusCode};
use serde::Serialize;
use tracing::info;

use super::SessionView;
use crate::app::AppState;
use crate::auth::SignUp;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::session::RoleResolver;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignUpOutcome {
    SignedIn(SessionView),
    /// The address has to be confirmed before a session is issued.
    ConfirmationSent { email: String },
}

/// POST /auth/signup - create an account; name and phone travel as user metadata
pub async fn signup_post(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<SignUp>,
) -> ApiResult<SignUpOutcome> {
    payload.email = payload.email.trim().to_string();
    payload.name = payload.name.trim().to_string();
    if payload.email.is_empty() {
        return Err(ApiError::validation_error("Email is required", Some("email")));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation_error("Password is required", Some("password")));
    }
    if payload.name.is_empty() {
        return Err(ApiError::validation_error("Name is required", Some("name")));
    }

    let outcome = match state.backend.auth.sign_up(&payload).await? {
        Some(session) => {
            info!("Sign-up for {}", session.identity.id);
            let store = state.backend.store.scoped(Some(&session.access_token));
            let roles = RoleResolver::resolve(store, Some(&session.identity)).await;
            SignUpOutcome::SignedIn(SessionView::new(session, roles))
        }
        None => SignUpOutcome::ConfirmationSent {
            email: payload.email.clone(),
        },
    };

    Ok(ApiResponse {
        data: outcome,
        notice: Some("Account created successfully".to_string()),
        status_code: Some(StatusCode::CREATED),
    })
}
