use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod admin;
mod ai;
mod alumni;
pub mod auth;
mod error;
mod extract;
mod observability;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use crate::services::{AlumniService, AssistantService, AuthService};
use metrics_exporter_prometheus::PrometheusHandle;

const SESSION_COOKIE_NAME: &str = "alumni_session";

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn alumni_service(&self) -> &Arc<dyn AlumniService> {
        &self.shared.alumni_service
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn assistant(&self) -> &Arc<dyn AssistantService> {
        &self.shared.assistant
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config().server;

    let session_layer = SessionManagerLayer::new(state.shared.sessions.clone())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(server.secure_cookies)
        .with_http_only(true)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_ttl_minutes,
        )));

    let cors_layer = if server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
    };

    let api_router = Router::new()
        .merge(create_admin_router())
        .merge(create_protected_router())
        .route("/health", get(system::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .layer(session_layer)
        .with_state(state.clone());

    Router::new()
        .route("/", get(system::info))
        .nest("/api", api_router)
        .fallback(system::not_found)
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(
            cors_layer
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                ])
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        )
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/current", get(auth::current))
        .route(
            "/users",
            get(alumni::list_alumni).post(alumni::create_alumni),
        )
        .route(
            "/users/{id}",
            get(alumni::get_alumni)
                .put(alumni::update_alumni)
                .delete(alumni::delete_alumni),
        )
        .route("/ai/summary", post(ai::summary))
        .route("/ai/draft_email", post(ai::draft_email))
        .route("/ai/search", get(ai::search))
        .route("/ai/expand", get(ai::expand))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(auth::auth_middleware))
}

fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/users", get(admin::list_accounts))
        .route("/admin/users/{id}/toggle", post(admin::toggle_account))
        .route("/admin/users/{id}", axum::routing::delete(admin::delete_account))
        .route_layer(middleware::from_fn(auth::require_admin))
}
