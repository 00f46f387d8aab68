use axum::debug_handler;
use axum::http::StatusCode;
use tower_sessions::Session;

use crate::error::AppResult;

#[debug_handler]
pub(crate) async fn logout(session: Session) -> AppResult<StatusCode> {
    session.flush().await?;
    Ok(StatusCode::NO_CONTENT)
}
