// handlers/public/pages.rs - GET /, /about, /nav, /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::Serialize;
use serde_json::json;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::nav::Navigation;
use crate::session::Viewer;

#[derive(Debug, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

const FEATURES: [Feature; 3] = [
    Feature {
        title: "Find your place",
        description: "Browse PGs, flats and rooms and narrow them by city, type and budget.",
    },
    Feature {
        title: "List with confidence",
        description: "Owners publish and manage their listings from one dashboard.",
    },
    Feature {
        title: "Talk directly",
        description: "Every listing shows the owner's contact details. No brokers.",
    },
];

const ABOUT: [&str; 3] = [
    "RentEase connects people looking for a place to stay with the owners who have one.",
    "Tenants browse listings for free. Owners list and manage properties themselves.",
    "Our team reviews listings and messages so the marketplace stays trustworthy.",
];

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub name: &'static str,
    pub version: &'static str,
    pub tagline: &'static str,
    pub features: &'static [Feature],
    pub nav: Navigation,
}

#[derive(Debug, Serialize)]
pub struct AboutPage {
    pub title: &'static str,
    pub body: &'static [&'static str],
    pub nav: Navigation,
}

/// GET / - product blurb, feature list and navigation
pub async fn home_get(Extension(viewer): Extension<Viewer>) -> ApiResult<HomePage> {
    Ok(ApiResponse::success(HomePage {
        name: "RentEase",
        version: env!("CARGO_PKG_VERSION"),
        tagline: "Rentals made simple: find a PG, flat or room that fits your budget.",
        features: &FEATURES,
        nav: Navigation::for_state(&viewer.state),
    }))
}

/// GET /about
pub async fn about_get(Extension(viewer): Extension<Viewer>) -> ApiResult<AboutPage> {
    Ok(ApiResponse::success(AboutPage {
        title: "About RentEase",
        body: &ABOUT,
        nav: Navigation::for_state(&viewer.state),
    }))
}

/// GET /nav - navigation for the current viewer
pub async fn nav_get(Extension(viewer): Extension<Viewer>) -> ApiResult<Navigation> {
    Ok(ApiResponse::success(Navigation::for_state(&viewer.state)))
}

/// GET /health - checks the record store is reachable
pub async fn health_get(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.backend.store.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "backend": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "backend unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "backend_error": e.to_string()
                }
            })),
        ),
    }
}
