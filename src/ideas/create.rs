use axum::debug_handler;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::models::{now_rfc3339, Idea, IdeaStatus};

#[derive(Deserialize)]
pub(crate) struct CreateIdeaBody {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn create_idea(
    State(db_pool): State<SqlitePool>,
    identity: Identity,
    Json(body): Json<CreateIdeaBody>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let user = identity.require_user()?;

    let title = body.title.trim().to_owned();
    if title.is_empty() {
        return Err(AppError::Validation("title must not be empty".into()));
    }

    let now = now_rfc3339();
    let idea = Idea {
        id: Uuid::now_v7(),
        owner_id: user.id,
        title,
        description: body.description,
        tags: super::normalize_tags(body.tags),
        status: IdeaStatus::Draft,
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        "INSERT INTO ideas (id, owner_id, title, description, tags, status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(idea.id.to_string())
    .bind(idea.owner_id.to_string())
    .bind(&idea.title)
    .bind(&idea.description)
    .bind(serde_json::to_string(&idea.tags)?)
    .bind(idea.status.as_str())
    .bind(&idea.created_at)
    .bind(&idea.updated_at)
    .execute(&db_pool)
    .await?;

    tracing::debug!(idea = %idea.id, owner = %idea.owner_id, "idea created");
    Ok((StatusCode::CREATED, Json(json!({ "data": idea }))))
}
