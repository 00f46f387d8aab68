use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;

/// Current UTC time as the RFC 3339 string every table stores.
/// Nanoseconds are dropped so stored timestamps compare lexicographically.
pub fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    let now = now.replace_nanosecond(0).unwrap_or(now);
    now.format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}

/// UTC midnight of the current day, same format as [`now_rfc3339`].
pub fn today_start_rfc3339() -> String {
    let midnight = OffsetDateTime::now_utc().replace_time(time::Time::MIDNIGHT);
    midnight
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Result<Role, AppError> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            other => Err(AppError::Internal(anyhow::anyhow!("unknown role {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub identity: String,
    pub role: Role,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub identity: String,
    pub role: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<User, AppError> {
        Ok(User {
            id: parse_uuid(&row.id)?,
            identity: row.identity,
            role: Role::parse(&row.role)?,
            display_name: row.display_name,
            avatar_url: row.avatar_url,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl IdeaStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IdeaStatus::Draft => "draft",
            IdeaStatus::Submitted => "submitted",
            IdeaStatus::Approved => "approved",
            IdeaStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<IdeaStatus, AppError> {
        match s {
            "draft" => Ok(IdeaStatus::Draft),
            "submitted" => Ok(IdeaStatus::Submitted),
            "approved" => Ok(IdeaStatus::Approved),
            "rejected" => Ok(IdeaStatus::Rejected),
            other => Err(AppError::Validation(format!("unknown status {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Idea {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub status: IdeaStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(sqlx::FromRow)]
pub struct IdeaRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<IdeaRow> for Idea {
    type Error = AppError;

    fn try_from(row: IdeaRow) -> Result<Idea, AppError> {
        Ok(Idea {
            id: parse_uuid(&row.id)?,
            owner_id: parse_uuid(&row.owner_id)?,
            title: row.title,
            description: row.description,
            tags: serde_json::from_str(&row.tags)?,
            status: IdeaStatus::parse(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    StatusChange,
    UserComment,
    AdminComment,
    NewComment,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::StatusChange => "status_change",
            NotificationKind::UserComment => "user_comment",
            NotificationKind::AdminComment => "admin_comment",
            NotificationKind::NewComment => "new_comment",
        }
    }

    pub fn parse(s: &str) -> Result<NotificationKind, AppError> {
        match s {
            "status_change" => Ok(NotificationKind::StatusChange),
            "user_comment" => Ok(NotificationKind::UserComment),
            "admin_comment" => Ok(NotificationKind::AdminComment),
            "new_comment" => Ok(NotificationKind::NewComment),
            other => Err(AppError::Internal(anyhow::anyhow!(
                "unknown notification kind {other}"
            ))),
        }
    }
}

/// Structured notification payload, one variant per triggering event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationPayload {
    StatusChange {
        old_status: IdeaStatus,
        new_status: IdeaStatus,
    },
    CommentAdded {
        comment_id: Uuid,
        author_id: Uuid,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub idea_id: Uuid,
    pub kind: NotificationKind,
    pub payload: NotificationPayload,
    pub read: bool,
    pub created_at: String,
}

#[derive(sqlx::FromRow)]
pub struct NotificationRow {
    pub id: String,
    pub recipient_id: String,
    pub idea_id: String,
    pub kind: String,
    pub payload: String,
    pub read: bool,
    pub created_at: String,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> Result<Notification, AppError> {
        Ok(Notification {
            id: parse_uuid(&row.id)?,
            recipient_id: parse_uuid(&row.recipient_id)?,
            idea_id: parse_uuid(&row.idea_id)?,
            kind: NotificationKind::parse(&row.kind)?,
            payload: serde_json::from_str(&row.payload)?,
            read: row.read,
            created_at: row.created_at,
        })
    }
}

pub fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(s).map_err(|err| AppError::Internal(anyhow::anyhow!("bad uuid {s:?}: {err}")))
}
