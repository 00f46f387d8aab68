use axum::debug_handler;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::ideas::lifecycle;
use crate::models::now_rfc3339;
use crate::notify;

/// Owner hands a draft (or a previously rejected idea) over for review.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn submit_idea(
    State(db_pool): State<SqlitePool>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let user = identity.require_user()?;
    let mut idea = super::fetch_idea(&db_pool, id)
        .await?
        .ok_or(AppError::NotFound("idea"))?;

    if user.id != idea.owner_id {
        return Err(AppError::Forbidden);
    }

    let old = idea.status;
    let new = lifecycle::submit(&idea)?;

    idea.status = new;
    idea.updated_at = now_rfc3339();
    sqlx::query("UPDATE ideas SET status = ?, updated_at = ? WHERE id = ?")
        .bind(new.as_str())
        .bind(&idea.updated_at)
        .bind(idea.id.to_string())
        .execute(&db_pool)
        .await?;

    tracing::info!(idea = %idea.id, from = old.as_str(), to = new.as_str(), "idea submitted");
    notify::status_changed(&db_pool, &idea, old, new).await;

    Ok(Json(json!({ "data": idea })))
}
