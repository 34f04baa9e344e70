use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use sha2::{Digest, Sha512};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::warn;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, MemoryAuthService, StudyService};

mod assets;
pub mod auth;
mod catalog;
mod error;
mod observability;
mod types;
mod users;
mod validation;

pub use auth::CurrentUser;
pub use error::ApiError;
pub use types::*;

pub const SESSION_COOKIE_NAME: &str = "studyquest.sid";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub study_service: Arc<StudyService>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

/// Build state around an existing store.
#[must_use]
pub fn create_app_state(
    config: Config,
    store: Store,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let auth_service: Arc<dyn AuthService> = Arc::new(MemoryAuthService::new(store.clone()));
    let study_service = Arc::new(StudyService::new(store.clone()));

    Arc::new(AppState {
        config: Arc::new(config),
        store,
        auth_service,
        study_service,
        prometheus_handle,
    })
}

/// Build state with a freshly seeded store.
pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let store = Store::seeded().await;
    create_app_state(config, store, prometheus_handle)
}

/// Derive the 64-byte cookie signing key from an arbitrary-length secret.
fn session_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = state.config().server.clone();

    if server.uses_fallback_secret() {
        warn!(
            "No session secret configured; using the insecure built-in fallback. Set SESSION_SECRET."
        );
    }

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_idle_minutes,
        )))
        .with_signed(session_key(server.session_secret_or_fallback()));

    let protected_routes = create_protected_router();

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/subjects", get(catalog::list_subjects))
        .route("/subjects/{id}", get(catalog::get_subject))
        .route("/grades", get(catalog::list_grades))
        .route("/textbooks", get(catalog::list_textbooks))
        .route("/textbooks/{id}", get(catalog::get_textbook))
        .route("/leaderboard", get(users::leaderboard))
        .route("/metrics", get(observability::get_metrics))
        .fallback(|| async { ApiError::not_found("Endpoint") })
        .layer(session_layer)
        .with_state(state);

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

    Router::new()
        .nest("/api", api_router)
        .fallback_service(assets::spa_service(&server.static_dir))
        .layer(
            cors_layer
                .allow_methods([Method::GET, Method::POST, Method::PATCH])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user", get(auth::current_user))
        .route(
            "/tests",
            get(study_tests::list_tests).post(study_tests::create_test),
        )
        .route("/tests/upcoming", get(study_tests::upcoming_tests))
        .route(
            "/tests/{id}",
            get(study_tests::get_test).patch(study_tests::update_test),
        )
        .route("/streak", post(users::update_streak))
        .route_layer(middleware::from_fn(auth::require_session))
}
