// handlers/mod.rs - handlers grouped by who may reach them
//
// Public (anyone) → Protected (owner role) → Elevated (admin role)
//
// Every request first passes `middleware::resolve_viewer`, so handlers read
// the caller from the `Viewer` extension. Role checks happen in the handler,
// before anything is fetched.
pub mod elevated;
pub mod protected;
pub mod public;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::listing::{ConfirmedDelete, DeleteRequest};

/// `?confirm=true` on destructive routes.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

impl ConfirmQuery {
    /// Turns a pending delete into a confirmed one, or answers 409 without
    /// touching the store.
    pub fn confirm(&self, request: DeleteRequest) -> Result<ConfirmedDelete, ApiError> {
        if self.confirm {
            Ok(request.confirm())
        } else {
            Err(ApiError::confirmation_required(
                "Are you sure you want to delete this property? Repeat with ?confirm=true",
            ))
        }
    }
}

/// Path ids are parsed by hand so a malformed id gets our error body.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid property id: {}", raw)))
}
