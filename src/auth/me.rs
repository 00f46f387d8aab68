use axum::debug_handler;
use axum::Json;
use serde_json::json;

use crate::auth::Identity;
use crate::error::AppResult;

/// Degraded-but-authenticated sessions (profile row missing) get
/// `user: null` rather than an error.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn me(identity: Identity) -> AppResult<Json<serde_json::Value>> {
    Ok(Json(json!({ "user": identity.user })))
}
