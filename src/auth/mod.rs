use axum::routing::{get, post};
use axum::Router;
use rand::seq::IndexedRandom;
use sqlx::SqlitePool;
use uuid::Uuid;

mod identity;
mod login;
mod logout;
mod me;

pub use identity::Identity;

use crate::error::AppResult;
use crate::models::{now_rfc3339, Role, User, UserRow};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login::login))
        .route("/auth/logout", post(logout::logout))
        .route("/auth/me", get(me::me))
}

pub(crate) async fn find_user(db: &SqlitePool, identity: &str) -> AppResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE identity = ?")
        .bind(identity)
        .fetch_optional(db)
        .await?;
    row.map(User::try_from).transpose()
}

/// First authentication for an identity creates the profile row. Role
/// always starts as `owner`; promotion to admin happens out-of-band.
pub(crate) async fn create_user(db: &SqlitePool, identity: &str) -> AppResult<User> {
    let adjectives = [
        "Quiet", "Curious", "Sunny", "Patient", "Restless", "Keen", "Vivid",
        "Steady", "Earnest", "Nimble", "Candid", "Merry",
    ];
    let nouns = [
        "Otter", "Heron", "Badger", "Lynx", "Magpie", "Beaver", "Finch",
        "Marten", "Osprey", "Vole", "Stoat", "Wren",
    ];
    // ThreadRng is not Send; keep it scoped so it is gone before any await.
    let display_name = {
        let mut rng = rand::rng();
        format!(
            "{} {}",
            adjectives.choose(&mut rng).copied().unwrap_or("Keen"),
            nouns.choose(&mut rng).copied().unwrap_or("Otter"),
        )
    };

    let user = User {
        id: Uuid::now_v7(),
        identity: identity.to_owned(),
        role: Role::Owner,
        display_name,
        avatar_url: None,
        created_at: now_rfc3339(),
    };

    tracing::info!(user = %user.id, "creating profile on first login");
    sqlx::query(
        "INSERT INTO users (id, identity, role, display_name, avatar_url, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id.to_string())
    .bind(&user.identity)
    .bind(user.role.as_str())
    .bind(&user.display_name)
    .bind(&user.avatar_url)
    .bind(&user.created_at)
    .execute(db)
    .await?;

    Ok(user)
}
