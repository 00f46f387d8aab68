use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("no profile exists for this identity")]
    ProfileMissing,
    #[error("you are not allowed to do that")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    InvalidStatus(String),
    #[error("{0}")]
    Validation(String),
    #[error("daily assist limit reached")]
    RateLimited,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("assist service error: {0}")]
    Service(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str) {
        use AppError::*;
        match self {
            Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            ProfileMissing => (StatusCode::FORBIDDEN, "profile_missing"),
            Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            InvalidStatus(_) => (StatusCode::BAD_REQUEST, "invalid_status"),
            Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            Service(_) => (StatusCode::INTERNAL_SERVER_ERROR, "service_error"),
            Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();

        // Internals go to the log, not over the wire.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": code,
            "message": message,
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

macro_rules! internal_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Internal(anyhow::Error::from(err))
            }
        }
    };
}

internal_impl!(serde_json::Error);
internal_impl!(tower_sessions::session::Error);

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Service(err.to_string())
    }
}
