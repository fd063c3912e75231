use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Sport;

/// How progress toward a target is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
    Maintain,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "goal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
    Cancelled,
    Overdue,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "goal_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "goal_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    Performance,
    Skill,
    Fitness,
    Academic,
    Personal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TargetMetric {
    pub name: String,
    pub unit: Option<String>,
    pub current_value: f64,
    pub target_value: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Milestone {
    pub title: String,
    pub target_value: f64,
    #[serde(default)]
    pub achieved: bool,
    pub achieved_at: Option<DateTime<Utc>>,
}

/// One entry of the append-only progress log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProgressUpdate {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub notes: Option<String>,
    pub updated_by: Uuid,
}

/// Computed progress state of a goal.
///
/// Fields are private: the percentage is only ever written by the goal
/// progress service, and the update log can only grow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GoalProgress {
    percentage: u8,
    #[serde(default)]
    milestones: Vec<Milestone>,
    #[serde(default)]
    updates: Vec<ProgressUpdate>,
}

impl GoalProgress {
    pub(crate) fn new(percentage: u8, milestones: Vec<Milestone>) -> Self {
        Self {
            percentage,
            milestones,
            updates: Vec::new(),
        }
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn updates(&self) -> &[ProgressUpdate] {
        &self.updates
    }

    pub(crate) fn set_percentage(&mut self, percentage: u8) {
        self.percentage = percentage.min(100);
    }

    pub(crate) fn append_update(&mut self, update: ProgressUpdate) {
        self.updates.push(update);
    }

    pub(crate) fn milestones_mut(&mut self) -> &mut Vec<Milestone> {
        &mut self.milestones
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoachFeedback {
    pub coach_id: Uuid,
    pub comment: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Goal {
    pub goal_id: Uuid,
    pub athlete_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: GoalCategory,
    pub sport: Sport,
    pub target_metric: TargetMetric,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    pub status: GoalStatus,
    pub priority: GoalPriority,
    pub progress: GoalProgress,
    pub editors: Vec<Uuid>,
    pub viewers: Vec<Uuid>,
    pub feedback: Vec<CoachFeedback>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn is_editor(&self, user_id: Uuid) -> bool {
        self.editors.contains(&user_id)
    }

    pub fn is_viewer(&self, user_id: Uuid) -> bool {
        self.viewers.contains(&user_id)
    }
}
