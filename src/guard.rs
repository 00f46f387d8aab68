//! Authorization predicates. Every mutating handler calls the matching
//! predicate before touching the database; a `false` answer becomes a 403
//! and nothing is written.

use crate::models::{Idea, IdeaStatus, Role, User};

pub fn can_view(actor: &User, idea: &Idea) -> bool {
    actor.id == idea.owner_id || actor.role == Role::Admin
}

pub fn can_modify_content(actor: &User, idea: &Idea) -> bool {
    actor.id == idea.owner_id
        && matches!(idea.status, IdeaStatus::Draft | IdeaStatus::Rejected)
}

pub fn can_decide(actor: &User, idea: &Idea) -> bool {
    actor.role == Role::Admin && idea.status == IdeaStatus::Submitted
}

pub fn can_comment(actor: &User, idea: &Idea) -> bool {
    actor.id == idea.owner_id || actor.role == Role::Admin
}

pub fn can_delete(actor: &User, idea: &Idea) -> bool {
    actor.id == idea.owner_id && idea.status == IdeaStatus::Draft
}
