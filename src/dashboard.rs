use axum::debug_handler;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::Identity;
use crate::error::AppResult;
use crate::models::{Idea, IdeaRow};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

#[derive(Default, Serialize)]
struct StatusCounts {
    draft: i64,
    submitted: i64,
    approved: i64,
    rejected: i64,
    total: i64,
}

/// Owners get counts over their own ideas; admins get platform-wide counts
/// plus the review backlog and the user total.
#[debug_handler(state = AppState)]
async fn dashboard(
    State(db_pool): State<SqlitePool>,
    identity: Identity,
) -> AppResult<Json<serde_json::Value>> {
    let user = identity.require_user()?;
    let admin = identity.is_admin();

    let sql = if admin {
        "SELECT status, COUNT(*) FROM ideas GROUP BY status"
    } else {
        "SELECT status, COUNT(*) FROM ideas WHERE owner_id = ? GROUP BY status"
    };
    let mut q = sqlx::query_as::<_, (String, i64)>(sql);
    if !admin {
        q = q.bind(user.id.to_string());
    }

    let mut counts = StatusCounts::default();
    for (status, count) in q.fetch_all(&db_pool).await? {
        counts.total += count;
        match status.as_str() {
            "draft" => counts.draft = count,
            "submitted" => counts.submitted = count,
            "approved" => counts.approved = count,
            "rejected" => counts.rejected = count,
            _ => {}
        }
    }

    let recent_sql = if admin {
        "SELECT * FROM ideas ORDER BY updated_at DESC LIMIT 5"
    } else {
        "SELECT * FROM ideas WHERE owner_id = ? ORDER BY updated_at DESC LIMIT 5"
    };
    let mut q = sqlx::query_as::<_, IdeaRow>(recent_sql);
    if !admin {
        q = q.bind(user.id.to_string());
    }
    let recent = q
        .fetch_all(&db_pool)
        .await?
        .into_iter()
        .map(Idea::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let pending_review = counts.submitted;
    let mut body = json!({ "counts": counts, "recent": recent });

    if admin {
        let (user_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&db_pool)
            .await?;
        body["pending_review"] = json!(pending_review);
        body["user_count"] = json!(user_count);
    }

    Ok(Json(body))
}
