use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{Direction, GoalCategory, GoalPriority, GoalStatus, Sport};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct TargetMetricInput {
    #[validate(length(min = 1, max = 100, message = "Metric name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 50))]
    pub unit: Option<String>,

    #[serde(default)]
    pub current_value: f64,

    #[validate(custom(function = "validate_target_value"))]
    pub target_value: f64,

    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct MilestoneInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    pub target_value: f64,
}

/// Request payload for creating a goal for an athlete
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_goal_dates"))]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub category: GoalCategory,

    /// Defaults to the athlete's sport
    pub sport: Option<Sport>,

    #[validate(nested)]
    pub target_metric: TargetMetricInput,

    /// Defaults to today
    pub start_date: Option<NaiveDate>,

    pub target_date: NaiveDate,

    #[serde(default)]
    pub priority: GoalPriority,

    #[serde(default)]
    #[validate(nested)]
    pub milestones: Vec<MilestoneInput>,

    #[serde(default)]
    pub editors: Vec<Uuid>,

    #[serde(default)]
    pub viewers: Vec<Uuid>,
}

/// Field edits. Progress is never writable here; use the progress endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub category: Option<GoalCategory>,

    pub priority: Option<GoalPriority>,

    pub target_date: Option<NaiveDate>,

    #[validate(custom(function = "validate_editable_status"))]
    pub status: Option<GoalStatus>,

    #[validate(custom(function = "validate_target_value"))]
    pub target_value: Option<f64>,

    #[validate(length(max = 50))]
    pub unit: Option<String>,

    pub editors: Option<Vec<Uuid>>,

    pub viewers: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProgressUpdateRequest {
    pub value: f64,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct FeedbackRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment must be between 1 and 2000 characters"))]
    pub comment: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GoalFilter {
    pub status: Option<GoalStatus>,
}

/// Goal counts and mean progress for one athlete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GoalProgressRollup {
    pub total_goals: usize,
    pub active_goals: usize,
    pub completed_goals: usize,
    pub average_progress: u8,
}

/// Result of the overdue sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OverdueSweepResponse {
    pub updated_goals: u64,
}

fn validate_target_value(value: f64) -> Result<(), ValidationError> {
    if value <= 0.0 || !value.is_finite() {
        let mut err = ValidationError::new("non_positive_target");
        err.message = Some("Target value must be a positive number".into());
        return Err(err);
    }
    Ok(())
}

// Completed and overdue are reached through progress updates only.
fn validate_editable_status(status: &GoalStatus) -> Result<(), ValidationError> {
    match status {
        GoalStatus::Active | GoalStatus::Paused | GoalStatus::Cancelled => Ok(()),
        GoalStatus::Completed | GoalStatus::Overdue => {
            Err(ValidationError::new("status_not_editable"))
        }
    }
}

fn validate_goal_dates(req: &CreateGoalRequest) -> Result<(), ValidationError> {
    if let Some(start) = req.start_date
        && req.target_date < start
    {
        let mut err = ValidationError::new("target_before_start");
        err.message = Some("Target date must not be before start date".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(target_value: f64) -> CreateGoalRequest {
        serde_json::from_value(serde_json::json!({
            "title": "Improve free throws",
            "category": "skill",
            "target_metric": {
                "name": "free throw %",
                "unit": "%",
                "target_value": target_value,
                "direction": "increase"
            },
            "start_date": "2025-01-01",
            "target_date": "2025-06-01"
        }))
        .unwrap()
    }

    #[test]
    fn test_create_request_defaults() {
        let req = create_request(80.0);
        assert!(req.validate().is_ok());
        assert_eq!(req.priority, GoalPriority::Medium);
        assert_eq!(req.target_metric.current_value, 0.0);
        assert!(req.milestones.is_empty());
    }

    #[test]
    fn test_zero_target_is_rejected() {
        let req = create_request(0.0);
        let errors = req.validate().unwrap_err();
        assert!(errors.errors().contains_key("target_metric"));
    }

    #[test]
    fn test_negative_target_is_rejected() {
        let errors = create_request(-10.0).validate().unwrap_err();
        assert!(errors.errors().contains_key("target_metric"));

        let update = UpdateGoalRequest {
            target_value: Some(-1.5),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_target_before_start_is_rejected() {
        let mut req = create_request(80.0);
        req.target_date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_cannot_force_completion() {
        let req = UpdateGoalRequest {
            status: Some(GoalStatus::Completed),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let pause = UpdateGoalRequest {
            status: Some(GoalStatus::Paused),
            ..Default::default()
        };
        assert!(pause.validate().is_ok());
    }

    #[test]
    fn test_update_rejects_zero_target() {
        let req = UpdateGoalRequest {
            target_value: Some(0.0),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_feedback_rating_range() {
        let ok = FeedbackRequest {
            comment: "Great week".into(),
            rating: 5,
        };
        assert!(ok.validate().is_ok());

        let bad = FeedbackRequest {
            comment: "Great week".into(),
            rating: 6,
        };
        assert!(bad.validate().is_err());
    }
}
