//! The caller's notification feed. Recipients only ever see and mutate
//! their own rows; the only mutation is flipping the read flag.

use axum::debug_handler;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::models::{Notification, NotificationRow};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/inbox", get(list_inbox).patch(mark_read))
}

#[derive(Deserialize)]
struct InboxQuery {
    read: Option<bool>,
    sort: Option<String>,
    order: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

#[debug_handler(state = AppState)]
async fn list_inbox(
    State(db_pool): State<SqlitePool>,
    identity: Identity,
    Query(query): Query<InboxQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let user = identity.require_user()?;

    // sort/order are interpolated into SQL, so whitelist them strictly.
    let sort = match query.sort.as_deref() {
        None | Some("created_at") => "created_at",
        Some(other) => {
            return Err(AppError::Validation(format!("cannot sort by {other:?}")));
        }
    };
    let order = match query.order.as_deref() {
        None | Some("desc") => "DESC",
        Some("asc") => "ASC",
        Some(other) => {
            return Err(AppError::Validation(format!("unknown order {other:?}")));
        }
    };
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let mut sql = String::from("SELECT * FROM notifications WHERE recipient_id = ?");
    if query.read.is_some() {
        sql.push_str(" AND read = ?");
    }
    sql.push_str(&format!(" ORDER BY {sort} {order} LIMIT ? OFFSET ?"));

    let mut q = sqlx::query_as::<_, NotificationRow>(&sql).bind(user.id.to_string());
    if let Some(read) = query.read {
        q = q.bind(read);
    }
    let rows = q.bind(limit).bind(offset).fetch_all(&db_pool).await?;

    let notifications = rows
        .into_iter()
        .map(Notification::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(json!({ "data": notifications })))
}

#[derive(Deserialize)]
struct MarkReadBody {
    ids: Vec<Uuid>,
    read: bool,
}

/// Ids belonging to somebody else are silently ignored, not an error.
#[debug_handler(state = AppState)]
async fn mark_read(
    State(db_pool): State<SqlitePool>,
    identity: Identity,
    Json(MarkReadBody { ids, read }): Json<MarkReadBody>,
) -> AppResult<Json<serde_json::Value>> {
    let user = identity.require_user()?;

    if ids.is_empty() {
        return Ok(Json(json!({ "updated": 0 })));
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "UPDATE notifications SET read = ? WHERE recipient_id = ? AND id IN ({placeholders})"
    );

    let mut q = sqlx::query(&sql).bind(read).bind(user.id.to_string());
    for id in &ids {
        q = q.bind(id.to_string());
    }
    let result = q.execute(&db_pool).await?;

    Ok(Json(json!({ "updated": result.rows_affected() })))
}
