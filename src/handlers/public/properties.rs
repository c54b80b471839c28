// handlers/public/properties.rs - GET /properties, GET /properties/:id

use axum::{
    extract::{Path, Query},
    Extension,
};
use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::listing::{FilterCriteria, ListingBrowser, RawCriteria};
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Listing;
use crate::session::Viewer;

pub const LOAD_FAILED: &str = "Failed to load properties";
pub const DETAIL_FAILED: &str = "Failed to load property details";

#[derive(Debug, Serialize)]
pub struct BrowseView {
    pub properties: Vec<Listing>,
    pub total: usize,
    pub filtered: bool,
}

/// GET /properties?location=&type=&max_rent= - available listings, newest first
///
/// A failed load still answers 200 with an empty list and a notice.
pub async fn properties_get(
    Extension(viewer): Extension<Viewer>,
    Query(raw): Query<RawCriteria>,
) -> ApiResult<BrowseView> {
    let criteria = FilterCriteria::from(&raw);
    let filtered = !criteria.is_default();

    let (listings, notice) = match viewer.repository().available_listings().await {
        Ok(listings) => (listings, None),
        Err(e) => {
            warn!("Browse load failed: {}", e);
            (Vec::new(), Some(LOAD_FAILED))
        }
    };

    let mut browser = ListingBrowser::new(listings);
    browser.set_criteria(criteria);
    let total = browser.total();

    let response = ApiResponse::success(BrowseView {
        properties: browser.into_visible(),
        total,
        filtered,
    });
    Ok(match notice {
        Some(notice) => response.with_notice(notice),
        None => response,
    })
}

/// GET /properties/:id - one listing with the owner's contact details
///
/// Any failure sends the client back to the browse view.
pub async fn property_get(
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<Listing> {
    let id = parse_id(&id).map_err(|_| ApiError::ListingUnavailable(DETAIL_FAILED.to_string()))?;

    match viewer.repository().listing_detail(id).await {
        Ok(listing) => Ok(ApiResponse::success(listing)),
        Err(e) => {
            warn!("Detail load for {} failed: {}", id, e);
            Err(ApiError::ListingUnavailable(DETAIL_FAILED.to_string()))
        }
    }
}
