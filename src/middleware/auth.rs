use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
    Extension,
};

use crate::app::AppState;
use crate::auth::AccessToken;
use crate::error::ApiError;
use crate::session::Viewer;

/// Resolves the caller of every request into a [`Viewer`] extension.
///
/// No `Authorization` header means an anonymous viewer. A header that is
/// present but malformed, or a token that does not verify, is rejected
/// rather than silently downgraded.
pub async fn resolve_viewer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let viewer = match extract_bearer(request.headers()).map_err(ApiError::unauthorized)? {
        Some(token) => Viewer::resolve(&state.backend, token).await?,
        None => Viewer::anonymous(&state.backend),
    };

    request.extensions_mut().insert(viewer);
    Ok(next.run(request).await)
}

/// Rejects anonymous viewers. Runs after [`resolve_viewer`].
pub async fn require_bearer(
    Extension(viewer): Extension<Viewer>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if viewer.token.is_none() {
        return Err(ApiError::authentication_required());
    }
    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header, if any
fn extract_bearer(headers: &HeaderMap) -> Result<Option<AccessToken>, String> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(AccessToken::new(token.trim()))),
        Some(_) => Err("Empty bearer token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}
