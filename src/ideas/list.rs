use axum::debug_handler;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::Identity;
use crate::error::AppResult;
use crate::models::{Idea, IdeaRow, IdeaStatus};

#[derive(Deserialize)]
pub(crate) struct ListQuery {
    status: Option<String>,
    search: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

/// Non-admins only ever see their own ideas; admins see everything.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn list_ideas(
    State(db_pool): State<SqlitePool>,
    identity: Identity,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let user = identity.require_user()?;

    let status = query.status.as_deref().map(IdeaStatus::parse).transpose()?;
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let mut sql = String::from("SELECT * FROM ideas WHERE 1=1");
    if !identity.is_admin() {
        sql.push_str(" AND owner_id = ?");
    }
    if status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if query.search.is_some() {
        sql.push_str(" AND (title LIKE ? OR description LIKE ?)");
    }
    sql.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

    let mut q = sqlx::query_as::<_, IdeaRow>(&sql);
    if !identity.is_admin() {
        q = q.bind(user.id.to_string());
    }
    if let Some(status) = status {
        q = q.bind(status.as_str());
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{}%", search.trim());
        q = q.bind(pattern.clone()).bind(pattern);
    }
    let rows = q.bind(limit).bind(offset).fetch_all(&db_pool).await?;

    let ideas = rows
        .into_iter()
        .map(Idea::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(json!({ "data": ideas })))
}
