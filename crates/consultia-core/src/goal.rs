//! Business goals tracked on the client.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::ids::GoalId;

/// Progress state of a goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(crate::error::CoreError::UnknownVariant {
                kind: "goal status",
                value: other.to_string(),
            }),
        }
    }
}

/// Goal fields supplied by the user; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    /// Percent complete, 0 to 100.
    #[serde(default)]
    pub progress: u8,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub status: GoalStatus,
}

impl GoalDraft {
    pub fn new(title: impl Into<String>, category: Category, target_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category,
            progress: 0,
            target_date,
            status: GoalStatus::Pending,
        }
    }
}

/// A stored goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessGoal {
    pub id: GoalId,
    #[serde(flatten)]
    pub draft: GoalDraft,
}

impl BusinessGoal {
    pub fn new(id: GoalId, mut draft: GoalDraft) -> Self {
        draft.progress = draft.progress.min(100);
        Self { id, draft }
    }

    pub fn is_completed(&self) -> bool {
        self.draft.status == GoalStatus::Completed
    }

    /// A goal is overdue once its target day has been reached without completion.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.draft.target_date <= today
    }
}
