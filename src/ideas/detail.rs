use axum::debug_handler;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::guard;
use crate::models::now_rfc3339;

#[debug_handler(state = crate::AppState)]
pub(crate) async fn get_idea(
    State(db_pool): State<SqlitePool>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let user = identity.require_user()?;
    let idea = super::fetch_idea(&db_pool, id)
        .await?
        .ok_or(AppError::NotFound("idea"))?;

    if !guard::can_view(user, &idea) {
        return Err(AppError::Forbidden);
    }

    Ok(Json(json!({ "data": idea })))
}

#[derive(Deserialize)]
pub(crate) struct UpdateIdeaBody {
    title: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
}

/// Partial content update. Only the owner may edit, and only while the idea
/// is still theirs to shape (draft or rejected).
#[debug_handler(state = crate::AppState)]
pub(crate) async fn update_idea(
    State(db_pool): State<SqlitePool>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateIdeaBody>,
) -> AppResult<Json<serde_json::Value>> {
    let user = identity.require_user()?;
    let mut idea = super::fetch_idea(&db_pool, id)
        .await?
        .ok_or(AppError::NotFound("idea"))?;

    if !guard::can_modify_content(user, &idea) {
        return Err(AppError::Forbidden);
    }

    if let Some(title) = body.title {
        let title = title.trim().to_owned();
        if title.is_empty() {
            return Err(AppError::Validation("title must not be empty".into()));
        }
        idea.title = title;
    }
    if let Some(description) = body.description {
        idea.description = description;
    }
    if let Some(tags) = body.tags {
        idea.tags = super::normalize_tags(tags);
    }
    idea.updated_at = now_rfc3339();

    sqlx::query("UPDATE ideas SET title = ?, description = ?, tags = ?, updated_at = ? WHERE id = ?")
        .bind(&idea.title)
        .bind(&idea.description)
        .bind(serde_json::to_string(&idea.tags)?)
        .bind(&idea.updated_at)
        .bind(idea.id.to_string())
        .execute(&db_pool)
        .await?;

    Ok(Json(json!({ "data": idea })))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn delete_idea(
    State(db_pool): State<SqlitePool>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let user = identity.require_user()?;
    let idea = super::fetch_idea(&db_pool, id)
        .await?
        .ok_or(AppError::NotFound("idea"))?;

    if !guard::can_delete(user, &idea) {
        return Err(AppError::Forbidden);
    }

    sqlx::query("DELETE FROM ideas WHERE id = ?")
        .bind(idea.id.to_string())
        .execute(&db_pool)
        .await?;

    tracing::debug!(idea = %idea.id, "draft deleted");
    Ok(StatusCode::NO_CONTENT)
}
