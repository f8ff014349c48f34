use axum::{
    Json, Router,
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod error;
pub mod notes;
mod observability;
mod types;
pub mod users;
mod validation;

pub use error::{ApiError, ErrorBody};
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

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
    pub fn auth_service(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn note_service(&self) -> &Arc<dyn crate::services::NoteService> {
        &self.shared.note_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
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

/// Build the HTTP application around an injected session store.
pub fn router<S>(state: Arc<AppState>, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let config = state.config();

    let session_layer = SessionManagerLayer::new(session_store)
        .with_name(config.session.cookie_name.clone())
        .with_secure(config.server.secure_cookies)
        .with_http_only(true)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_always_save(true)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(i64::from(
            config.session.inactivity_minutes,
        ))));

    let cors_layer = cors_layer(&config.server.cors_allowed_origins);

    let api_router = Router::new()
        .merge(create_protected_router())
        .route("/users/signup", post(users::signup))
        .route("/users/login", post(users::login))
        .route("/users/logout", post(users::logout))
        .fallback(endpoint_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(session_layer)
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_router)
        .route("/metrics", get(observability::get_metrics))
        .fallback(endpoint_not_found)
        .with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(users::get_authenticated_user))
        .route("/users/", get(users::get_authenticated_user))
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route("/notes/", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/{note_id}",
            get(notes::get_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        .route_layer(middleware::from_fn(auth::require_session))
}

/// Session cookies need credentialed CORS, which cannot be combined with a
/// wildcard origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|s| s.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

async fn endpoint_not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            error: "Method not allowed".to_string(),
        }),
    )
}
