use axum::debug_handler;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

mod gateway;
mod service;

pub use service::{Assist, HttpImproveService, ImproveService};

use crate::auth::Identity;
use crate::config::Config;
use crate::error::AppResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/ai/idea-helper", post(idea_helper))
}

#[derive(Deserialize)]
struct IdeaHelperBody {
    title: String,
    #[serde(default)]
    description: String,
}

#[debug_handler(state = AppState)]
async fn idea_helper(
    State(db_pool): State<SqlitePool>,
    State(assist): State<Assist>,
    State(config): State<Config>,
    identity: Identity,
    Json(IdeaHelperBody { title, description }): Json<IdeaHelperBody>,
) -> AppResult<Json<serde_json::Value>> {
    let user = identity.require_user()?;

    let outcome = gateway::improve(
        &db_pool,
        assist.0.as_ref(),
        config.assist_daily_limit,
        user.id,
        &title,
        &description,
    )
    .await?;

    Ok(Json(json!({
        "improvedCopy": outcome.improved,
        "tags": outcome.tags,
        "usage": {
            "used": outcome.used,
            "limit": outcome.limit,
            "remaining": outcome.limit - outcome.used,
        },
    })))
}
