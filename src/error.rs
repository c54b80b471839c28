// HTTP API Error Types
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::listing::FormError;
use crate::session::access::{AUTH_ROUTE, HOME_ROUTE};
use crate::session::AccessError;
use crate::store::StoreError;

pub const PROPERTIES_ROUTE: &str = "/properties";

/// HTTP API error with status code, client-friendly message and, where the
/// client should move elsewhere, a redirect target.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field: Option<String>,
    },
    InvalidJson(String),

    // 401 Unauthorized
    AuthenticationRequired(String),
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),
    ListingUnavailable(String),

    // 409 Conflict
    Conflict(String),
    ConfirmationRequired(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (backend refused or unreachable)
    BadGateway(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::AuthenticationRequired(_) => 401,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::ListingUnavailable(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::ConfirmationRequired(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::BadGateway(_) => 502,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::AuthenticationRequired(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::ListingUnavailable(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::ConfirmationRequired(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::AuthenticationRequired(_) => "AUTHENTICATION_REQUIRED",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::ListingUnavailable(_) => "LISTING_UNAVAILABLE",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::ConfirmationRequired(_) => "CONFIRMATION_REQUIRED",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Route the client should navigate to instead of the requested view.
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            ApiError::AuthenticationRequired(_) => Some(AUTH_ROUTE),
            ApiError::Forbidden(_) => Some(HOME_ROUTE),
            ApiError::ListingUnavailable(_) => Some(PROPERTIES_ROUTE),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        });

        if let ApiError::ValidationError { field: Some(field), .. } = self {
            response["field"] = json!(field);
        }
        if let Some(redirect) = self.redirect() {
            response["redirect"] = json!(redirect);
        }

        response
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, field: Option<&str>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn authentication_required() -> Self {
        ApiError::AuthenticationRequired(AccessError::AuthenticationRequired.to_string())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn confirmation_required(message: impl Into<String>) -> Self {
        ApiError::ConfirmationRequired(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_json(rejection.body_text())
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::AuthenticationRequired => ApiError::authentication_required(),
            AccessError::Denied(_) => ApiError::forbidden(err.to_string()),
        }
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation { field, message } => ApiError::validation_error(message, Some(field)),
            FormError::Remote(notice) => ApiError::bad_gateway(notice),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            AuthError::InvalidToken(_) => ApiError::unauthorized("Invalid or expired session"),
            AuthError::AlreadyRegistered(_) => ApiError::conflict("User already registered"),
            AuthError::Rejected { status, message } if (400..500).contains(&status) => {
                ApiError::bad_request(message)
            }
            AuthError::Rejected { .. } | AuthError::Transport(_) => {
                // Log the real error but return generic message
                tracing::error!("Auth service error: {}", err);
                ApiError::bad_gateway("Authentication service unavailable")
            }
            AuthError::Config(msg) => {
                tracing::error!("Auth configuration error: {}", msg);
                ApiError::internal_server_error("Authentication is not configured")
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::not_found(msg),
            StoreError::InvalidQuery(msg) => {
                tracing::error!("Invalid store query: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            other => {
                tracing::error!("Record store error: {}", other);
                ApiError::bad_gateway("Record store unavailable")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn denial_carries_notice_and_home_redirect() {
        let err = ApiError::from(AccessError::Denied(Role::Owner));
        assert_eq!(err.status_code(), 403);
        let body = err.to_json();
        assert_eq!(body["message"], "Access denied. Owner role required.");
        assert_eq!(body["redirect"], "/");
    }

    #[test]
    fn missing_identity_redirects_to_auth() {
        let body = ApiError::from(AccessError::AuthenticationRequired).to_json();
        assert_eq!(body["code"], "AUTHENTICATION_REQUIRED");
        assert_eq!(body["redirect"], "/auth");
    }

    #[test]
    fn validation_names_the_field() {
        let err = ApiError::from(FormError::Validation {
            field: "rent",
            message: "Rent must be positive".to_string(),
        });
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_json()["field"], "rent");
    }

    #[test]
    fn remote_form_failure_is_bad_gateway_with_notice() {
        let err = ApiError::from(FormError::Remote("Failed to save property"));
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.message(), "Failed to save property");
    }
}
