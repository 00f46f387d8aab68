use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use uuid::Uuid;

pub mod lifecycle;

mod comment;
mod create;
mod decision;
mod detail;
mod list;
mod submit;

use crate::error::AppResult;
use crate::models::{Idea, IdeaRow};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ideas", post(create::create_idea).get(list::list_ideas))
        .route(
            "/ideas/{id}",
            get(detail::get_idea)
                .put(detail::update_idea)
                .delete(detail::delete_idea),
        )
        .route("/ideas/{id}/submit", post(submit::submit_idea))
        .route("/ideas/{id}/comment", post(comment::comment_idea))
        .route("/admin/ideas/{id}/decision", post(decision::decide_idea))
}

pub(crate) async fn fetch_idea(db: &SqlitePool, id: Uuid) -> AppResult<Option<Idea>> {
    let row: Option<IdeaRow> = sqlx::query_as("SELECT * FROM ideas WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(db)
        .await?;
    row.map(Idea::try_from).transpose()
}

/// Trim, drop empties, deduplicate while keeping first-seen order.
pub(crate) fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
