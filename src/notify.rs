//! Notification fan-out. One triggering event (a comment, a status change)
//! becomes zero or more notification rows for distinct recipients. The
//! trigger has already committed by the time we run, so failures here are
//! logged and swallowed, never bubbled back to the caller.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    now_rfc3339, Comment, Idea, IdeaStatus, NotificationKind, NotificationPayload, Role, User,
};

/// Best-effort fan-out for a freshly inserted comment.
pub async fn comment_created(db: &SqlitePool, idea: &Idea, comment: &Comment, author: &User) {
    if let Err(err) = fan_out_comment(db, idea, comment, author).await {
        tracing::error!(
            idea = %idea.id,
            comment = %comment.id,
            error = %err,
            "comment fan-out failed"
        );
    }
}

/// Best-effort fan-out for a committed status transition. The idea's owner
/// gets exactly one `status_change` notification; there is no admin
/// broadcast for transitions.
pub async fn status_changed(db: &SqlitePool, idea: &Idea, old: IdeaStatus, new: IdeaStatus) {
    let payload = NotificationPayload::StatusChange {
        old_status: old,
        new_status: new,
    };
    if let Err(err) = insert(db, idea.owner_id, idea.id, NotificationKind::StatusChange, &payload).await
    {
        tracing::error!(idea = %idea.id, error = %err, "status-change fan-out failed");
    }
}

/// The two comment rules are independent and may both fire:
/// 1. author is not the owner -> the owner hears about it, kind depending
///    on whether an admin wrote it;
/// 2. author is not an admin -> every admin (except the author) gets a
///    `new_comment`, even when the owner happens to be an admin too.
/// The author never hears about their own comment.
async fn fan_out_comment(
    db: &SqlitePool,
    idea: &Idea,
    comment: &Comment,
    author: &User,
) -> AppResult<()> {
    let payload = NotificationPayload::CommentAdded {
        comment_id: comment.id,
        author_id: author.id,
    };
    let author_is_admin = author.role == Role::Admin;

    if author.id != idea.owner_id {
        let kind = if author_is_admin {
            NotificationKind::AdminComment
        } else {
            NotificationKind::UserComment
        };
        insert(db, idea.owner_id, idea.id, kind, &payload).await?;
    }

    if !author_is_admin {
        let admins: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM users WHERE role = 'admin' AND id != ?")
                .bind(author.id.to_string())
                .fetch_all(db)
                .await?;
        for (admin_id,) in admins {
            let admin_id = crate::models::parse_uuid(&admin_id)?;
            insert(db, admin_id, idea.id, NotificationKind::NewComment, &payload).await?;
        }
    }

    Ok(())
}

async fn insert(
    db: &SqlitePool,
    recipient: Uuid,
    idea_id: Uuid,
    kind: NotificationKind,
    payload: &NotificationPayload,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO notifications (id, recipient_id, idea_id, kind, payload, read, created_at) \
         VALUES (?, ?, ?, ?, ?, 0, ?)",
    )
    .bind(Uuid::now_v7().to_string())
    .bind(recipient.to_string())
    .bind(idea_id.to_string())
    .bind(kind.as_str())
    .bind(serde_json::to_string(payload)?)
    .bind(now_rfc3339())
    .execute(db)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_memory;
    use crate::models::{Notification, NotificationRow};

    async fn seed_user(db: &SqlitePool, role: Role) -> User {
        let user = User {
            id: Uuid::now_v7(),
            identity: Uuid::now_v7().to_string(),
            role,
            display_name: "someone".into(),
            avatar_url: None,
            created_at: now_rfc3339(),
        };
        sqlx::query(
            "INSERT INTO users (id, identity, role, display_name, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.identity)
        .bind(user.role.as_str())
        .bind(&user.display_name)
        .bind(&user.created_at)
        .execute(db)
        .await
        .unwrap();
        user
    }

    async fn seed_idea(db: &SqlitePool, owner: &User) -> Idea {
        let idea = Idea {
            id: Uuid::now_v7(),
            owner_id: owner.id,
            title: "Solar kettle".into(),
            description: String::new(),
            tags: vec![],
            status: IdeaStatus::Draft,
            created_at: now_rfc3339(),
            updated_at: now_rfc3339(),
        };
        sqlx::query(
            "INSERT INTO ideas (id, owner_id, title, description, tags, status, created_at, updated_at) \
             VALUES (?, ?, ?, '', '[]', 'draft', ?, ?)",
        )
        .bind(idea.id.to_string())
        .bind(owner.id.to_string())
        .bind(&idea.title)
        .bind(&idea.created_at)
        .bind(&idea.updated_at)
        .execute(db)
        .await
        .unwrap();
        idea
    }

    fn comment_by(idea: &Idea, author: &User) -> Comment {
        Comment {
            id: Uuid::now_v7(),
            idea_id: idea.id,
            author_id: author.id,
            body: "interesting".into(),
            created_at: now_rfc3339(),
        }
    }

    async fn all_notifications(db: &SqlitePool) -> Vec<Notification> {
        let rows: Vec<NotificationRow> =
            sqlx::query_as("SELECT * FROM notifications ORDER BY created_at")
                .fetch_all(db)
                .await
                .unwrap();
        rows.into_iter().map(|r| r.try_into().unwrap()).collect()
    }

    #[tokio::test]
    async fn owner_comment_broadcasts_to_admins_only() {
        let db = connect_memory().await.unwrap();
        let owner = seed_user(&db, Role::Owner).await;
        let admin_b = seed_user(&db, Role::Admin).await;
        let admin_c = seed_user(&db, Role::Admin).await;
        let idea = seed_idea(&db, &owner).await;
        let comment = comment_by(&idea, &owner);

        comment_created(&db, &idea, &comment, &owner).await;

        let got = all_notifications(&db).await;
        assert_eq!(got.len(), 2);
        let mut recipients: Vec<_> = got.iter().map(|n| n.recipient_id).collect();
        recipients.sort();
        let mut expected = vec![admin_b.id, admin_c.id];
        expected.sort();
        assert_eq!(recipients, expected);
        for n in &got {
            assert_eq!(n.kind, NotificationKind::NewComment);
            assert_eq!(
                n.payload,
                NotificationPayload::CommentAdded {
                    comment_id: comment.id,
                    author_id: owner.id
                }
            );
        }
    }

    #[tokio::test]
    async fn admin_comment_notifies_owner_only() {
        let db = connect_memory().await.unwrap();
        let owner = seed_user(&db, Role::Owner).await;
        let admin = seed_user(&db, Role::Admin).await;
        let idea = seed_idea(&db, &owner).await;
        let comment = comment_by(&idea, &admin);

        comment_created(&db, &idea, &comment, &admin).await;

        let got = all_notifications(&db).await;
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].recipient_id, owner.id);
        assert_eq!(got[0].kind, NotificationKind::AdminComment);
    }

    #[tokio::test]
    async fn non_admin_non_owner_comment_fires_both_rules() {
        let db = connect_memory().await.unwrap();
        let owner = seed_user(&db, Role::Owner).await;
        let admin = seed_user(&db, Role::Admin).await;
        let visitor = seed_user(&db, Role::Owner).await;
        let idea = seed_idea(&db, &owner).await;
        let comment = comment_by(&idea, &visitor);

        comment_created(&db, &idea, &comment, &visitor).await;

        let got = all_notifications(&db).await;
        assert_eq!(got.len(), 2);
        assert!(got
            .iter()
            .any(|n| n.recipient_id == owner.id && n.kind == NotificationKind::UserComment));
        assert!(got
            .iter()
            .any(|n| n.recipient_id == admin.id && n.kind == NotificationKind::NewComment));
    }

    #[tokio::test]
    async fn admin_owner_hears_both_rules_for_a_visitor_comment() {
        let db = connect_memory().await.unwrap();
        let owner = seed_user(&db, Role::Admin).await;
        let visitor = seed_user(&db, Role::Owner).await;
        let idea = seed_idea(&db, &owner).await;
        let comment = comment_by(&idea, &visitor);

        comment_created(&db, &idea, &comment, &visitor).await;

        let got = all_notifications(&db).await;
        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|n| n.recipient_id == owner.id));
        assert!(got.iter().any(|n| n.kind == NotificationKind::UserComment));
        assert!(got.iter().any(|n| n.kind == NotificationKind::NewComment));
    }

    #[tokio::test]
    async fn fan_out_failure_is_swallowed() {
        let db = connect_memory().await.unwrap();
        let owner = seed_user(&db, Role::Owner).await;
        let _admin = seed_user(&db, Role::Admin).await;
        let idea = seed_idea(&db, &owner).await;
        let comment = comment_by(&idea, &owner);

        sqlx::query("ALTER TABLE notifications RENAME TO notifications_shelved")
            .execute(&db)
            .await
            .unwrap();

        // both entry points must come back quietly despite the broken table
        comment_created(&db, &idea, &comment, &owner).await;
        status_changed(&db, &idea, IdeaStatus::Draft, IdeaStatus::Submitted).await;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notifications_shelved")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn admin_author_is_excluded_from_broadcast() {
        let db = connect_memory().await.unwrap();
        let owner = seed_user(&db, Role::Owner).await;
        let admin = seed_user(&db, Role::Admin).await;
        let idea = seed_idea(&db, &owner).await;
        let comment = comment_by(&idea, &admin);

        comment_created(&db, &idea, &comment, &admin).await;

        let got = all_notifications(&db).await;
        assert!(got.iter().all(|n| n.recipient_id != admin.id));
    }

    #[tokio::test]
    async fn status_change_notifies_owner_once() {
        let db = connect_memory().await.unwrap();
        let owner = seed_user(&db, Role::Owner).await;
        let _admin = seed_user(&db, Role::Admin).await;
        let idea = seed_idea(&db, &owner).await;

        status_changed(&db, &idea, IdeaStatus::Submitted, IdeaStatus::Approved).await;

        let got = all_notifications(&db).await;
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].recipient_id, owner.id);
        assert_eq!(got[0].kind, NotificationKind::StatusChange);
        assert_eq!(
            got[0].payload,
            NotificationPayload::StatusChange {
                old_status: IdeaStatus::Submitted,
                new_status: IdeaStatus::Approved
            }
        );
    }
}
