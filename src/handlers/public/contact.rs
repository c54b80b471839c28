// handlers/public/contact.rs - POST /contact

use axum::Extension;

use crate::contact::ContactDraft;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::models::NewContactMessage;
use crate::session::Viewer;

/// POST /contact - validate and store a contact message
pub async fn contact_post(
    Extension(viewer): Extension<Viewer>,
    ApiJson(draft): ApiJson<ContactDraft>,
) -> ApiResult<NewContactMessage> {
    let saved = draft.submit(&viewer.repository()).await?;
    Ok(ApiResponse::created(saved).with_notice("Message sent successfully"))
}
