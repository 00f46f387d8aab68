use axum::debug_handler;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::error::{AppError, AppResult};
use crate::session::USER_ID;
use crate::AppState;

#[derive(Deserialize)]
pub(crate) struct LoginBody {
    identity: String,
}

/// Trusted boundary where the host's verified identity assertion enters the
/// core. OAuth redirect mechanics live upstream of this endpoint.
#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(LoginBody { identity }): Json<LoginBody>,
) -> AppResult<Json<serde_json::Value>> {
    let identity = identity.trim().to_owned();
    if identity.is_empty() {
        return Err(AppError::Validation("identity must not be empty".into()));
    }

    let user = match super::find_user(&db_pool, &identity).await? {
        Some(user) => user,
        None => super::create_user(&db_pool, &identity).await?,
    };

    session.insert(USER_ID, identity).await?;
    tracing::debug!(user = %user.id, "session established");

    Ok(Json(json!({ "data": user })))
}
