pub mod auth;
pub mod json;
pub mod response;

pub use auth::{require_bearer, resolve_viewer};
pub use json::ApiJson;
pub use response::{ApiResponse, ApiResult};
