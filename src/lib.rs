pub mod assist;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod guard;
pub mod ideas;
pub mod inbox;
pub mod models;
pub mod notify;
pub mod session;

use axum::extract::FromRef;
use axum::Router;
use sqlx::SqlitePool;
use time::Duration;
use tower_http::cors::CorsLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub use assist::{Assist, HttpImproveService, ImproveService};
pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub assist: Assist,
    pub config: Config,
}

/// The full application router, session layer included, so tests serve the
/// same stack production does.
pub fn app(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::hours(8)));

    Router::new()
        .merge(auth::router())
        .merge(ideas::router())
        .merge(inbox::router())
        .merge(assist::router())
        .merge(dashboard::router())
        .with_state(state)
        .layer(session_layer)
        .layer(CorsLayer::permissive())
}
