// handlers/protected/owner.rs - /owner/dashboard, /owner/properties[/:id]

use axum::{
    extract::{Path, Query},
    Extension,
};
use serde::Serialize;

use crate::dashboard::{DashboardView, OwnerDashboard};
use crate::handlers::{parse_id, ConfirmQuery};
use crate::listing::{DeleteRequest, PropertyDraft};
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::models::Listing;
use crate::session::Viewer;

/// A saved listing plus the owner's reloaded collection.
#[derive(Debug, Serialize)]
pub struct SavedView {
    pub property: Listing,
    pub dashboard: DashboardView<Vec<Listing>>,
}

/// GET /owner/dashboard - the caller's listings, newest first
pub async fn dashboard_get(
    Extension(viewer): Extension<Viewer>,
) -> ApiResult<DashboardView<Vec<Listing>>> {
    let dashboard = OwnerDashboard::open(viewer.repository(), &viewer.state).await?;
    let view = dashboard.into_view();
    let notice = view.notice.clone();

    let response = ApiResponse::success(view);
    Ok(match notice {
        Some(notice) => response.with_notice(notice),
        None => response,
    })
}

/// POST /owner/properties - add a listing owned by the caller
pub async fn property_post(
    Extension(viewer): Extension<Viewer>,
    ApiJson(draft): ApiJson<PropertyDraft>,
) -> ApiResult<SavedView> {
    let mut dashboard = OwnerDashboard::new(viewer.repository(), &viewer.state)?;
    let property = dashboard.save(None, &draft).await?;

    Ok(ApiResponse::created(SavedView {
        property,
        dashboard: dashboard.into_view(),
    })
    .with_notice("Property added successfully"))
}

/// PUT /owner/properties/:id - replace a listing's fields
pub async fn property_put(
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    ApiJson(draft): ApiJson<PropertyDraft>,
) -> ApiResult<SavedView> {
    let mut dashboard = OwnerDashboard::new(viewer.repository(), &viewer.state)?;
    let id = parse_id(&id)?;
    let property = dashboard.save(Some(id), &draft).await?;

    Ok(ApiResponse::success(SavedView {
        property,
        dashboard: dashboard.into_view(),
    })
    .with_notice("Property updated successfully"))
}

/// DELETE /owner/properties/:id?confirm=true
pub async fn property_delete(
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    Query(confirm): Query<ConfirmQuery>,
) -> ApiResult<DashboardView<Vec<Listing>>> {
    let mut dashboard = OwnerDashboard::new(viewer.repository(), &viewer.state)?;
    let request = confirm.confirm(DeleteRequest::new(parse_id(&id)?))?;
    dashboard.delete(request).await?;

    Ok(ApiResponse::success(dashboard.into_view()).with_notice("Property deleted successfully"))
}
