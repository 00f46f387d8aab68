//! The idea status state machine. Four states, four edges:
//! draft -> submitted, rejected -> submitted, submitted -> approved,
//! submitted -> rejected. Everything else is an `InvalidStatus` error.

use serde::Deserialize;

use crate::error::AppError;
use crate::models::{Idea, IdeaStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    Approve,
    Reject,
}

/// Owner submits (or resubmits) an idea for review.
pub fn submit(idea: &Idea) -> Result<IdeaStatus, AppError> {
    match idea.status {
        IdeaStatus::Draft | IdeaStatus::Rejected => {
            if idea.title.trim().chars().count() < 3 {
                return Err(AppError::Validation(
                    "title must be at least 3 characters".into(),
                ));
            }
            Ok(IdeaStatus::Submitted)
        }
        other => Err(AppError::InvalidStatus(format!(
            "cannot submit an idea that is {}",
            other.as_str()
        ))),
    }
}

/// Admin approves or rejects a submitted idea. The decision comment is
/// mandatory and length-checked before any write happens.
pub fn decide(idea: &Idea, action: DecisionAction, comment: &str) -> Result<IdeaStatus, AppError> {
    if idea.status != IdeaStatus::Submitted {
        return Err(AppError::InvalidStatus(format!(
            "cannot decide on an idea that is {}",
            idea.status.as_str()
        )));
    }

    let len = comment.trim().chars().count();
    if !(3..=1000).contains(&len) {
        return Err(AppError::Validation(
            "decision comment must be between 3 and 1000 characters".into(),
        ));
    }

    Ok(match action {
        DecisionAction::Approve => IdeaStatus::Approved,
        DecisionAction::Reject => IdeaStatus::Rejected,
    })
}
