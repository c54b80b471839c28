// handlers/elevated/admin.rs - /admin/dashboard, /admin/properties/:id

use axum::{
    extract::{Path, Query},
    Extension,
};
use serde::Serialize;

use crate::dashboard::{AdminCounts, AdminDashboard, AdminData, DashboardView};
use crate::handlers::{parse_id, ConfirmQuery};
use crate::listing::DeleteRequest;
use crate::middleware::{ApiResponse, ApiResult};
use crate::session::Viewer;

#[derive(Debug, Serialize)]
pub struct AdminView {
    pub counts: AdminCounts,
    #[serde(flatten)]
    pub view: DashboardView<AdminData>,
}

impl From<AdminDashboard> for AdminView {
    fn from(dashboard: AdminDashboard) -> Self {
        Self {
            counts: dashboard.counts(),
            view: dashboard.into_view(),
        }
    }
}

/// GET /admin/dashboard - users, listings and messages with counts
pub async fn dashboard_get(Extension(viewer): Extension<Viewer>) -> ApiResult<AdminView> {
    let dashboard = AdminDashboard::open(viewer.repository(), &viewer.state).await?;
    let view = AdminView::from(dashboard);
    let notice = view.view.notice.clone();

    let response = ApiResponse::success(view);
    Ok(match notice {
        Some(notice) => response.with_notice(notice),
        None => response,
    })
}

/// DELETE /admin/properties/:id?confirm=true - remove any listing
pub async fn property_delete(
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    Query(confirm): Query<ConfirmQuery>,
) -> ApiResult<AdminView> {
    let mut dashboard = AdminDashboard::new(viewer.repository(), &viewer.state)?;
    let request = confirm.confirm(DeleteRequest::new(parse_id(&id)?))?;
    dashboard.delete_listing(request).await?;

    Ok(ApiResponse::success(AdminView::from(dashboard)).with_notice("Property deleted successfully"))
}
