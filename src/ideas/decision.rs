use axum::debug_handler;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::ideas::lifecycle::{self, DecisionAction};
use crate::models::{now_rfc3339, Role};
use crate::notify;

#[derive(Deserialize)]
pub(crate) struct DecisionBody {
    action: DecisionAction,
    comment: String,
}

/// Admin records a decision: a status transition always paired with a
/// feedback comment. The two writes commit independently; if the comment
/// insert fails after the status update went through, the transition
/// stands, the loss is logged, and the caller still sees success.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn decide_idea(
    State(db_pool): State<SqlitePool>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(DecisionBody { action, comment }): Json<DecisionBody>,
) -> AppResult<Json<serde_json::Value>> {
    let user = identity.require_user()?;
    // guard::can_decide folds the role and status checks into one answer;
    // they stay apart here because a wrong caller must see 403 while a
    // wrong state must see 400 (lifecycle::decide reports the latter).
    if user.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    let mut idea = super::fetch_idea(&db_pool, id)
        .await?
        .ok_or(AppError::NotFound("idea"))?;

    let old = idea.status;
    let new = lifecycle::decide(&idea, action, &comment)?;

    idea.status = new;
    idea.updated_at = now_rfc3339();
    sqlx::query("UPDATE ideas SET status = ?, updated_at = ? WHERE id = ?")
        .bind(new.as_str())
        .bind(&idea.updated_at)
        .bind(idea.id.to_string())
        .execute(&db_pool)
        .await?;

    tracing::info!(
        idea = %idea.id,
        admin = %user.id,
        from = old.as_str(),
        to = new.as_str(),
        "decision recorded"
    );

    match super::comment::insert_comment(&db_pool, &idea, user, comment.trim().to_owned()).await {
        Ok(comment) => notify::comment_created(&db_pool, &idea, &comment, user).await,
        Err(err) => {
            // Accepted inconsistency: decision stands, feedback is lost.
            tracing::error!(
                idea = %idea.id,
                error = %err,
                "decision comment insert failed after status update"
            );
        }
    }

    notify::status_changed(&db_pool, &idea, old, new).await;

    Ok(Json(json!({ "data": idea })))
}
