//! Goal progress computation and lifecycle transitions.
//!
//! Everything here is a pure function of the goal and an injected `now`;
//! persisting the result is the caller's job (one write per operation).

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::dto::goal::GoalProgressRollup;
use crate::models::{
    CoachFeedback, Direction, Goal, GoalProgress, GoalStatus, Milestone, ProgressUpdate,
    TargetMetric,
};
use crate::services::ratio::mean;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GoalError {
    #[error("Target value must be positive to compute progress")]
    NonPositiveTarget,

    #[error("Status of a completed goal can no longer be changed")]
    CompletedGoalLocked,

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
}

pub type Result<T> = std::result::Result<T, GoalError>;

/// Percentage of the target reached, rounded and clamped to `0..=100`.
///
/// * increase: `current / target`
/// * decrease: `(target - current) / target`
/// * maintain: `100 - |current - target| / target`
pub fn progress_percentage(metric: &TargetMetric) -> Result<u8> {
    let target = metric.target_value;
    if target <= 0.0 || !target.is_finite() {
        return Err(GoalError::NonPositiveTarget);
    }

    let current = metric.current_value;
    let raw = match metric.direction {
        Direction::Increase => (current / target * 100.0).min(100.0),
        Direction::Decrease => ((target - current) / target * 100.0).min(100.0),
        Direction::Maintain => (100.0 - (current - target).abs() / target * 100.0).max(0.0),
    };

    let rounded = raw.round();
    if rounded.is_nan() {
        return Ok(0);
    }

    Ok(rounded.clamp(0.0, 100.0) as u8)
}

/// Progress state for a goal that is about to be created.
pub fn initial_progress(metric: &TargetMetric, milestones: Vec<Milestone>) -> Result<GoalProgress> {
    let percentage = progress_percentage(metric)?;
    let mut progress = GoalProgress::new(percentage, milestones);
    mark_reached_milestones(
        progress.milestones_mut(),
        metric.direction,
        metric.current_value,
        None,
    );
    Ok(progress)
}

/// Records a new current value for the goal.
///
/// Appends to the update log, recomputes the percentage, marks milestones
/// reached by the new value and applies the status transition. A non-positive
/// target is rejected before anything is modified.
pub fn update_progress(
    goal: &mut Goal,
    value: f64,
    notes: Option<String>,
    updated_by: Uuid,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut metric = goal.target_metric.clone();
    metric.current_value = value;
    let percentage = progress_percentage(&metric)?;

    goal.target_metric = metric;
    goal.progress.set_percentage(percentage);
    goal.progress.append_update(ProgressUpdate {
        timestamp: now,
        value,
        notes,
        updated_by,
    });
    mark_reached_milestones(
        goal.progress.milestones_mut(),
        goal.target_metric.direction,
        value,
        Some(now),
    );
    settle_status(goal, now);
    goal.updated_at = now;

    tracing::debug!(
        goal_id = %goal.goal_id,
        percentage,
        status = ?goal.status,
        "goal progress updated"
    );

    Ok(())
}

/// Changes the target value and recomputes progress without touching the
/// update log.
pub fn retarget(goal: &mut Goal, target_value: f64, now: DateTime<Utc>) -> Result<()> {
    let mut metric = goal.target_metric.clone();
    metric.target_value = target_value;
    let percentage = progress_percentage(&metric)?;

    goal.target_metric = metric;
    goal.progress.set_percentage(percentage);
    settle_status(goal, now);
    goal.updated_at = now;

    Ok(())
}

/// Full transition for an active goal: completion is checked before
/// lateness, so a goal that reaches 100% on or after its due date is
/// completed, not overdue.
pub fn settle_status(goal: &mut Goal, now: DateTime<Utc>) {
    if goal.status != GoalStatus::Active {
        return;
    }

    if goal.progress.percentage() >= 100 {
        goal.status = GoalStatus::Completed;
        goal.completed_at = Some(now);
    } else if now.date_naive() > goal.target_date {
        goal.status = GoalStatus::Overdue;
    }
}

/// Applies a status edit, then settles the goal.
///
/// A completed goal keeps its status. Reactivating a goal that already sits
/// at 100% completes it again.
pub fn set_status(goal: &mut Goal, status: GoalStatus, now: DateTime<Utc>) -> Result<()> {
    if goal.status == GoalStatus::Completed {
        if status == GoalStatus::Completed {
            return Ok(());
        }
        return Err(GoalError::CompletedGoalLocked);
    }

    goal.status = status;
    settle_status(goal, now);
    goal.updated_at = now;

    Ok(())
}

/// Applies only the lateness rule. Returns whether the status changed.
pub fn refresh_status(goal: &mut Goal, now: DateTime<Utc>) -> bool {
    if goal.status == GoalStatus::Active && now.date_naive() > goal.target_date {
        goal.status = GoalStatus::Overdue;
        goal.updated_at = now;
        return true;
    }
    false
}

fn milestone_reached(direction: Direction, current: f64, milestone: f64) -> bool {
    match direction {
        Direction::Increase => current >= milestone,
        Direction::Decrease => current <= milestone,
        Direction::Maintain => false,
    }
}

fn mark_reached_milestones(
    milestones: &mut [Milestone],
    direction: Direction,
    current: f64,
    now: Option<DateTime<Utc>>,
) {
    for milestone in milestones.iter_mut().filter(|m| !m.achieved) {
        if milestone_reached(direction, current, milestone.target_value) {
            milestone.achieved = true;
            milestone.achieved_at = now;
        }
    }
}

pub fn add_milestone(goal: &mut Goal, title: String, target_value: f64, now: DateTime<Utc>) {
    let direction = goal.target_metric.direction;
    let current = goal.target_metric.current_value;

    let milestones = goal.progress.milestones_mut();
    milestones.push(Milestone {
        title,
        target_value,
        achieved: false,
        achieved_at: None,
    });
    mark_reached_milestones(milestones, direction, current, Some(now));
    goal.updated_at = now;
}

pub fn add_feedback(
    goal: &mut Goal,
    coach_id: Uuid,
    comment: String,
    rating: u8,
    now: DateTime<Utc>,
) -> Result<()> {
    if !(1..=5).contains(&rating) {
        return Err(GoalError::InvalidRating(rating));
    }

    goal.feedback.push(CoachFeedback {
        coach_id,
        comment,
        rating,
        created_at: now,
    });
    goal.updated_at = now;

    Ok(())
}

/// Counts and mean percentage over a set of goals.
pub fn rollup(goals: &[Goal]) -> GoalProgressRollup {
    let active_goals = goals
        .iter()
        .filter(|g| g.status == GoalStatus::Active)
        .count();
    let completed_goals = goals
        .iter()
        .filter(|g| g.status == GoalStatus::Completed)
        .count();
    let average = mean(goals.iter().map(|g| f64::from(g.progress.percentage())));

    GoalProgressRollup {
        total_goals: goals.len(),
        active_goals,
        completed_goals,
        average_progress: average.round().clamp(0.0, 100.0) as u8,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{GoalCategory, GoalPriority, Sport};
    use chrono::{Duration, NaiveDate, TimeZone};

    pub(crate) fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    pub(crate) fn goal_with(direction: Direction, current: f64, target: f64) -> Goal {
        let now = fixed_now();
        let metric = TargetMetric {
            name: "points per game".to_string(),
            unit: Some("pts".to_string()),
            current_value: current,
            target_value: target,
            direction,
        };
        Goal {
            goal_id: Uuid::new_v4(),
            athlete_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            title: "Score more".to_string(),
            description: None,
            category: GoalCategory::Performance,
            sport: Sport::Basketball,
            progress: initial_progress(&metric, Vec::new()).unwrap(),
            target_metric: metric,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            target_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            status: GoalStatus::Active,
            priority: GoalPriority::Medium,
            editors: Vec::new(),
            viewers: Vec::new(),
            feedback: Vec::new(),
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_increase_reaching_target_completes_goal() {
        for target in [1.0, 10.0, 50.0, 123.4] {
            let mut goal = goal_with(Direction::Increase, 0.0, target);
            update_progress(&mut goal, target, None, Uuid::new_v4(), fixed_now()).unwrap();

            assert_eq!(goal.progress.percentage(), 100);
            assert_eq!(goal.status, GoalStatus::Completed);
            assert_eq!(goal.completed_at, Some(fixed_now()));
        }
    }

    #[test]
    fn test_decrease_to_zero_is_full_progress() {
        let mut goal = goal_with(Direction::Decrease, 12.0, 20.0);
        update_progress(&mut goal, 0.0, None, Uuid::new_v4(), fixed_now()).unwrap();
        assert_eq!(goal.progress.percentage(), 100);
    }

    #[test]
    fn test_maintain_on_target_is_full_progress() {
        let mut goal = goal_with(Direction::Maintain, 70.0, 75.0);
        update_progress(&mut goal, 75.0, None, Uuid::new_v4(), fixed_now()).unwrap();
        assert_eq!(goal.progress.percentage(), 100);
    }

    #[test]
    fn test_percentage_is_clamped_for_every_direction() {
        for direction in [Direction::Increase, Direction::Decrease, Direction::Maintain] {
            for value in [-1_000.0, -1.0, 0.0, 49.0, 50.0, 51.0, 1_000.0, 1e12] {
                let metric = TargetMetric {
                    name: "m".to_string(),
                    unit: None,
                    current_value: value,
                    target_value: 50.0,
                    direction,
                };
                let pct = progress_percentage(&metric).unwrap();
                assert!(pct <= 100, "{direction:?} {value} -> {pct}");
            }
        }
    }

    #[test]
    fn test_overshoot_does_not_exceed_hundred() {
        let metric = TargetMetric {
            name: "m".to_string(),
            unit: None,
            current_value: 500.0,
            target_value: 50.0,
            direction: Direction::Increase,
        };
        assert_eq!(progress_percentage(&metric), Ok(100));

        let maintain = TargetMetric {
            direction: Direction::Maintain,
            ..metric.clone()
        };
        assert_eq!(progress_percentage(&maintain), Ok(0));

        let decrease = TargetMetric {
            direction: Direction::Decrease,
            ..metric
        };
        assert_eq!(progress_percentage(&decrease), Ok(0));
    }

    #[test]
    fn test_half_way_stays_active() {
        let mut goal = goal_with(Direction::Increase, 0.0, 50.0);
        update_progress(&mut goal, 25.0, Some("solid game".into()), Uuid::new_v4(), fixed_now())
            .unwrap();

        assert_eq!(goal.progress.percentage(), 50);
        assert_eq!(goal.status, GoalStatus::Active);
        assert_eq!(goal.target_metric.current_value, 25.0);
    }

    #[test]
    fn test_past_due_short_of_target_is_overdue() {
        let mut goal = goal_with(Direction::Increase, 0.0, 50.0);
        goal.target_date = fixed_now().date_naive() - Duration::days(1);

        update_progress(&mut goal, 30.0, None, Uuid::new_v4(), fixed_now()).unwrap();

        assert_eq!(goal.status, GoalStatus::Overdue);
        assert!(goal.completed_at.is_none());
    }

    #[test]
    fn test_reaching_target_after_due_date_completes() {
        let mut goal = goal_with(Direction::Increase, 0.0, 50.0);
        goal.target_date = fixed_now().date_naive() - Duration::days(3);

        update_progress(&mut goal, 50.0, None, Uuid::new_v4(), fixed_now()).unwrap();

        assert_eq!(goal.status, GoalStatus::Completed);
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let mut goal = goal_with(Direction::Increase, 0.0, 50.0);
        goal.target_date = fixed_now().date_naive();

        update_progress(&mut goal, 10.0, None, Uuid::new_v4(), fixed_now()).unwrap();

        assert_eq!(goal.status, GoalStatus::Active);
    }

    #[test]
    fn test_non_active_status_is_left_alone() {
        let mut goal = goal_with(Direction::Increase, 0.0, 50.0);
        goal.status = GoalStatus::Paused;
        goal.target_date = fixed_now().date_naive() - Duration::days(1);

        update_progress(&mut goal, 50.0, None, Uuid::new_v4(), fixed_now()).unwrap();

        assert_eq!(goal.progress.percentage(), 100);
        assert_eq!(goal.status, GoalStatus::Paused);
        assert!(goal.completed_at.is_none());
    }

    #[test]
    fn test_zero_target_is_rejected_without_mutation() {
        let mut goal = goal_with(Direction::Increase, 0.0, 50.0);
        goal.target_metric.target_value = 0.0;
        let before = goal.clone();

        let result = update_progress(&mut goal, 10.0, None, Uuid::new_v4(), fixed_now());

        assert_eq!(result, Err(GoalError::NonPositiveTarget));
        assert_eq!(goal, before);
    }

    #[test]
    fn test_update_log_is_append_only() {
        let mut goal = goal_with(Direction::Increase, 0.0, 100.0);
        let coach = Uuid::new_v4();
        let later = fixed_now() + Duration::hours(1);

        update_progress(&mut goal, 10.0, Some("first".into()), coach, fixed_now()).unwrap();
        let first_entry = goal.progress.updates()[0].clone();
        update_progress(&mut goal, 20.0, None, coach, later).unwrap();

        let updates = goal.progress.updates();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0], first_entry);
        assert_eq!(updates[1].value, 20.0);
        assert_eq!(updates[1].timestamp, later);
        assert_eq!(updates[1].updated_by, coach);
    }

    #[test]
    fn test_negative_value_is_accepted() {
        let mut goal = goal_with(Direction::Increase, 0.0, 50.0);
        update_progress(&mut goal, -10.0, None, Uuid::new_v4(), fixed_now()).unwrap();

        assert_eq!(goal.progress.percentage(), 0);
        assert_eq!(goal.progress.updates()[0].value, -10.0);
    }

    #[test]
    fn test_milestones_marked_when_reached() {
        let mut goal = goal_with(Direction::Increase, 0.0, 30.0);
        add_milestone(&mut goal, "10 points".into(), 10.0, fixed_now());
        add_milestone(&mut goal, "20 points".into(), 20.0, fixed_now());

        update_progress(&mut goal, 15.0, None, Uuid::new_v4(), fixed_now()).unwrap();

        let milestones = goal.progress.milestones();
        assert!(milestones[0].achieved);
        assert_eq!(milestones[0].achieved_at, Some(fixed_now()));
        assert!(!milestones[1].achieved);
    }

    #[test]
    fn test_decrease_milestones_use_lower_bound() {
        let mut goal = goal_with(Direction::Decrease, 15.0, 12.0);
        add_milestone(&mut goal, "under 14".into(), 14.0, fixed_now());

        update_progress(&mut goal, 13.5, None, Uuid::new_v4(), fixed_now()).unwrap();

        assert!(goal.progress.milestones()[0].achieved);
    }

    #[test]
    fn test_retarget_recomputes_without_logging() {
        let mut goal = goal_with(Direction::Increase, 20.0, 80.0);
        assert_eq!(goal.progress.percentage(), 25);

        retarget(&mut goal, 40.0, fixed_now()).unwrap();

        assert_eq!(goal.progress.percentage(), 50);
        assert!(goal.progress.updates().is_empty());
        assert_eq!(retarget(&mut goal, 0.0, fixed_now()), Err(GoalError::NonPositiveTarget));
        assert_eq!(goal.target_metric.target_value, 40.0);
    }

    #[test]
    fn test_goal_created_at_target_settles_as_completed() {
        let mut goal = goal_with(Direction::Increase, 50.0, 50.0);
        assert_eq!(goal.progress.percentage(), 100);

        settle_status(&mut goal, fixed_now());

        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.completed_at, Some(fixed_now()));
    }

    #[test]
    fn test_settle_prefers_completion_over_lateness() {
        let mut late = goal_with(Direction::Increase, 10.0, 50.0);
        late.target_date = fixed_now().date_naive() - Duration::days(1);
        settle_status(&mut late, fixed_now());
        assert_eq!(late.status, GoalStatus::Overdue);

        let mut late_but_done = goal_with(Direction::Decrease, 0.0, 20.0);
        late_but_done.target_date = fixed_now().date_naive() - Duration::days(1);
        settle_status(&mut late_but_done, fixed_now());
        assert_eq!(late_but_done.status, GoalStatus::Completed);
    }

    #[test]
    fn test_completed_goal_cannot_be_reactivated() {
        let mut goal = goal_with(Direction::Increase, 0.0, 50.0);
        update_progress(&mut goal, 50.0, None, Uuid::new_v4(), fixed_now()).unwrap();
        assert_eq!(goal.status, GoalStatus::Completed);
        let before = goal.clone();

        let later = fixed_now() + Duration::days(1);
        assert_eq!(
            set_status(&mut goal, GoalStatus::Active, later),
            Err(GoalError::CompletedGoalLocked)
        );
        assert_eq!(goal, before);
    }

    #[test]
    fn test_resuming_a_goal_at_full_progress_completes_it() {
        let mut goal = goal_with(Direction::Increase, 0.0, 50.0);
        goal.status = GoalStatus::Paused;
        update_progress(&mut goal, 50.0, None, Uuid::new_v4(), fixed_now()).unwrap();
        assert_eq!(goal.status, GoalStatus::Paused);

        let later = fixed_now() + Duration::days(1);
        set_status(&mut goal, GoalStatus::Active, later).unwrap();

        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.completed_at, Some(later));
    }

    #[test]
    fn test_reactivating_a_late_goal_marks_it_overdue() {
        let mut goal = goal_with(Direction::Increase, 10.0, 50.0);
        goal.status = GoalStatus::Paused;
        goal.target_date = fixed_now().date_naive() - Duration::days(1);

        set_status(&mut goal, GoalStatus::Active, fixed_now()).unwrap();
        assert_eq!(goal.status, GoalStatus::Overdue);

        set_status(&mut goal, GoalStatus::Cancelled, fixed_now()).unwrap();
        assert_eq!(goal.status, GoalStatus::Cancelled);
    }

    #[test]
    fn test_negative_target_is_rejected() {
        for direction in [Direction::Increase, Direction::Decrease, Direction::Maintain] {
            let metric = TargetMetric {
                name: "split time".to_string(),
                unit: None,
                current_value: -5.0,
                target_value: -5.0,
                direction,
            };
            assert_eq!(
                progress_percentage(&metric),
                Err(GoalError::NonPositiveTarget)
            );
        }
    }

    #[test]
    fn test_refresh_status_only_flags_late_active_goals() {
        let mut goal = goal_with(Direction::Increase, 0.0, 50.0);
        assert!(!refresh_status(&mut goal, fixed_now()));

        goal.target_date = fixed_now().date_naive() - Duration::days(1);
        assert!(refresh_status(&mut goal, fixed_now()));
        assert_eq!(goal.status, GoalStatus::Overdue);
        assert!(!refresh_status(&mut goal, fixed_now()));
    }

    #[test]
    fn test_feedback_rating_bounds() {
        let mut goal = goal_with(Direction::Increase, 0.0, 50.0);
        let coach = Uuid::new_v4();

        assert_eq!(
            add_feedback(&mut goal, coach, "nice".into(), 0, fixed_now()),
            Err(GoalError::InvalidRating(0))
        );
        assert_eq!(
            add_feedback(&mut goal, coach, "nice".into(), 6, fixed_now()),
            Err(GoalError::InvalidRating(6))
        );
        add_feedback(&mut goal, coach, "keep going".into(), 4, fixed_now()).unwrap();

        assert_eq!(goal.feedback.len(), 1);
        assert_eq!(goal.feedback[0].coach_id, coach);
    }

    #[test]
    fn test_rollup_counts_and_average() {
        let mut completed = goal_with(Direction::Increase, 0.0, 10.0);
        update_progress(&mut completed, 10.0, None, Uuid::new_v4(), fixed_now()).unwrap();
        let half = goal_with(Direction::Increase, 5.0, 10.0);
        let mut paused = goal_with(Direction::Increase, 3.0, 10.0);
        paused.status = GoalStatus::Paused;

        let summary = rollup(&[completed, half, paused]);

        assert_eq!(summary.total_goals, 3);
        assert_eq!(summary.active_goals, 1);
        assert_eq!(summary.completed_goals, 1);
        // (100 + 50 + 30) / 3 = 60
        assert_eq!(summary.average_progress, 60);
    }

    #[test]
    fn test_rollup_of_no_goals_is_zero() {
        let summary = rollup(&[]);
        assert_eq!(summary.total_goals, 0);
        assert_eq!(summary.average_progress, 0);
    }
}
