use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::backend::Backend;
use crate::config::{AppConfig, SecurityConfig};
use crate::handlers;
use crate::middleware::{require_bearer, resolve_viewer};

/// Shared by every handler: the backend clients and the loaded config.
#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(backend: Backend, config: AppConfig) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        // Public
        .merge(public_routes())
        .merge(session_routes())
        // Owner and admin views gate on the resolved viewer
        .merge(owner_routes())
        .merge(admin_routes())
        .layer(from_fn_with_state(state.clone(), resolve_viewer))
        // Credential grants ignore any stale bearer the client still sends
        .merge(auth_routes())
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    let router = match cors_layer(&config.security) {
        Some(cors) => router.layer(cors),
        None => router,
    };
    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{contact, pages, properties};

    Router::new()
        .route("/", get(pages::home_get))
        .route("/health", get(pages::health_get))
        .route("/about", get(pages::about_get))
        .route("/nav", get(pages::nav_get))
        .route("/properties", get(properties::properties_get))
        .route("/properties/:id", get(properties::property_get))
        .route("/contact", post(contact::contact_post))
}

fn auth_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/login", post(auth::login_post))
        .route("/auth/signup", post(auth::signup_post))
        .route("/auth/refresh", post(auth::refresh_post))
}

fn session_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/logout", post(auth::logout_post))
        .route_layer(from_fn(require_bearer))
}

fn owner_routes() -> Router<AppState> {
    use handlers::protected::owner;

    Router::new()
        .route(
            "/owner/dashboard",
            get(owner::dashboard_get).post(owner::property_post),
        )
        .route(
            "/owner/properties",
            get(owner::dashboard_get).post(owner::property_post),
        )
        .route(
            "/owner/properties/:id",
            put(owner::property_put).delete(owner::property_delete),
        )
}

fn admin_routes() -> Router<AppState> {
    use handlers::elevated::admin;

    Router::new()
        .route("/admin/dashboard", get(admin::dashboard_get))
        .route("/admin/properties/:id", delete(admin::property_delete))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
