//! Quota bookkeeping around the external call. The append-only
//! `assist_usage` table is both the audit log and the counter: today's row
//! count for a user is the number of attempts already spent. The count and
//! the call are deliberately not one transaction; two concurrent requests
//! near the limit can both slip through, which is accepted.

use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::assist::service::ImproveService;
use crate::error::{AppError, AppResult};
use crate::models::{now_rfc3339, today_start_rfc3339};

const INSTRUCTION: &str = "Improve the following product idea. Keep the author's intent, \
    tighten the wording, and suggest up to five short lowercase tags. Respond with JSON \
    only: {\"improvedText\": string, \"tags\": [string]}";

const MAX_TAGS: usize = 5;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Improvement {
    improved_text: String,
    tags: Vec<String>,
}

pub struct AssistOutcome {
    pub improved: String,
    pub tags: Vec<String>,
    pub used: i64,
    pub limit: i64,
}

pub async fn improve(
    db: &SqlitePool,
    service: &dyn ImproveService,
    daily_limit: i64,
    user_id: Uuid,
    title: &str,
    description: &str,
) -> AppResult<AssistOutcome> {
    let used = count_today(db, user_id).await?;
    if used >= daily_limit {
        tracing::debug!(user = %user_id, used, daily_limit, "assist quota exhausted");
        return Err(AppError::RateLimited);
    }

    let request_text = format!("{title}\n\n{description}");

    let payload = match service.improve(INSTRUCTION, title, description).await {
        Ok(payload) => payload,
        Err(err) => {
            record(db, user_id, &request_text, &format!("error: {err}"), true).await?;
            return Err(err);
        }
    };

    let improvement: Improvement = match serde_json::from_value(payload.clone()) {
        Ok(improvement) => improvement,
        Err(err) => {
            tracing::warn!(user = %user_id, error = %err, "malformed assist response");
            record(db, user_id, &request_text, &payload.to_string(), true).await?;
            return Err(AppError::Service("malformed assist response".into()));
        }
    };

    let tags: Vec<String> = improvement
        .tags
        .iter()
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .take(MAX_TAGS)
        .collect();

    record(db, user_id, &request_text, &payload.to_string(), false).await?;

    Ok(AssistOutcome {
        improved: improvement.improved_text,
        tags,
        used: used + 1,
        limit: daily_limit,
    })
}

async fn count_today(db: &SqlitePool, user_id: Uuid) -> AppResult<i64> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM assist_usage WHERE user_id = ? AND created_at >= ?",
    )
    .bind(user_id.to_string())
    .bind(today_start_rfc3339())
    .fetch_one(db)
    .await?;
    Ok(count)
}

async fn record(
    db: &SqlitePool,
    user_id: Uuid,
    request_text: &str,
    response: &str,
    failed: bool,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO assist_usage (id, user_id, request_text, response, failed, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(Uuid::now_v7().to_string())
    .bind(user_id.to_string())
    .bind(request_text)
    .bind(response)
    .bind(failed)
    .bind(now_rfc3339())
    .execute(db)
    .await?;
    Ok(())
}
