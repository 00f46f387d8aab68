use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{Role, User};
use crate::session::USER_ID;
use crate::AppState;

/// The resolved caller, threaded into handlers as a plain value. No session
/// means `Unauthenticated`; a session whose profile row has gone missing
/// resolves with `user = None` and callers decide how degraded access looks.
pub struct Identity {
    pub identity: String,
    pub user: Option<User>,
}

impl Identity {
    pub fn require_user(&self) -> Result<&User, AppError> {
        self.user.as_ref().ok_or(AppError::ProfileMissing)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.user.as_ref().map(|u| u.role), Some(Role::Admin))
    }
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| anyhow::anyhow!("session extraction failed: {msg}"))?;

        let Some(identity) = session.get::<String>(USER_ID).await? else {
            return Err(AppError::Unauthenticated);
        };

        let user = super::find_user(&state.db_pool, &identity).await?;
        Ok(Identity { identity, user })
    }
}
