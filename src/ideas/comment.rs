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
use crate::models::{now_rfc3339, Comment, Idea, User};
use crate::notify;

#[derive(Deserialize)]
pub(crate) struct CommentBody {
    body: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn comment_idea(
    State(db_pool): State<SqlitePool>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(CommentBody { body }): Json<CommentBody>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let user = identity.require_user()?;
    let idea = super::fetch_idea(&db_pool, id)
        .await?
        .ok_or(AppError::NotFound("idea"))?;

    if !guard::can_comment(user, &idea) {
        return Err(AppError::Forbidden);
    }

    let body = body.trim().to_owned();
    let len = body.chars().count();
    if !(1..=1000).contains(&len) {
        return Err(AppError::Validation(
            "comment must be between 1 and 1000 characters".into(),
        ));
    }

    let comment = insert_comment(&db_pool, &idea, user, body).await?;
    notify::comment_created(&db_pool, &idea, &comment, user).await;

    Ok((StatusCode::CREATED, Json(json!({ "data": comment }))))
}

pub(crate) async fn insert_comment(
    db: &SqlitePool,
    idea: &Idea,
    author: &User,
    body: String,
) -> AppResult<Comment> {
    let comment = Comment {
        id: Uuid::now_v7(),
        idea_id: idea.id,
        author_id: author.id,
        body,
        created_at: now_rfc3339(),
    };
    sqlx::query(
        "INSERT INTO comments (id, idea_id, author_id, body, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(comment.id.to_string())
    .bind(comment.idea_id.to_string())
    .bind(comment.author_id.to_string())
    .bind(&comment.body)
    .bind(&comment.created_at)
    .execute(db)
    .await?;
    Ok(comment)
}
