use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::goal::{
        CreateGoalRequest, FeedbackRequest, GoalFilter, MilestoneInput, ProgressUpdateRequest,
        UpdateGoalRequest,
    },
    models::{Athlete, Goal, GoalStatus, Milestone, TargetMetric},
    repository::{AthleteRepository, GoalRepository},
    services::{
        authorization::{Permission, Resource, is_allowed},
        goal_progress,
    },
};
use uuid::Uuid;

use crate::error::{ApiResult, WebError};
use crate::middleware::auth::{AuthUser, authorize};

async fn load_goal(pool: &PgPool, goal_id: Uuid) -> ApiResult<(Goal, Athlete)> {
    let goal = GoalRepository::new(pool).find_by_id(goal_id).await?;
    let athlete = AthleteRepository::new(pool)
        .find_by_id(goal.athlete_id)
        .await?;
    Ok((goal, athlete))
}

/// Goals of an athlete the caller may see.
///
/// Callers with access to the athlete see every goal; editors and viewers
/// only see the goals shared with them.
pub async fn list_goals(
    pool: &PgPool,
    user: &AuthUser,
    athlete_id: Uuid,
    filter: &GoalFilter,
) -> ApiResult<Vec<Goal>> {
    let athlete = AthleteRepository::new(pool).find_by_id(athlete_id).await?;
    let goals = GoalRepository::new(pool)
        .list_by_athlete(athlete_id, filter.status)
        .await?;

    let actor = user.actor();
    if is_allowed(&actor, Permission::ViewAthlete, Resource::Athlete(&athlete)) {
        return Ok(goals);
    }

    Ok(goals
        .into_iter()
        .filter(|goal| {
            is_allowed(
                &actor,
                Permission::ViewGoal,
                Resource::Goal {
                    goal,
                    athlete: &athlete,
                },
            )
        })
        .collect())
}

/// Create a goal for an athlete with its initial progress computed
pub async fn create_goal(
    pool: &PgPool,
    user: &AuthUser,
    athlete_id: Uuid,
    req: &CreateGoalRequest,
) -> ApiResult<Goal> {
    let athlete = AthleteRepository::new(pool).find_by_id(athlete_id).await?;
    authorize(user, Permission::CreateGoal, Resource::Athlete(&athlete))?;

    let now = Utc::now();
    let start_date = req.start_date.unwrap_or_else(|| now.date_naive());
    if req.target_date < start_date {
        return Err(WebError::BadRequest(
            "Target date must not be before start date".to_string(),
        ));
    }

    let target_metric = TargetMetric {
        name: req.target_metric.name.clone(),
        unit: req.target_metric.unit.clone(),
        current_value: req.target_metric.current_value,
        target_value: req.target_metric.target_value,
        direction: req.target_metric.direction,
    };
    let milestones = req.milestones.iter().map(new_milestone).collect();
    let progress = goal_progress::initial_progress(&target_metric, milestones)?;

    let mut goal = Goal {
        goal_id: Uuid::new_v4(),
        athlete_id,
        created_by: user.user_id(),
        title: req.title.clone(),
        description: req.description.clone(),
        category: req.category,
        sport: req.sport.unwrap_or(athlete.sport),
        target_metric,
        start_date,
        target_date: req.target_date,
        status: GoalStatus::Active,
        priority: req.priority,
        progress,
        editors: req.editors.clone(),
        viewers: req.viewers.clone(),
        feedback: Vec::new(),
        completed_at: None,
        created_at: now,
        updated_at: now,
    };
    goal_progress::settle_status(&mut goal, now);

    let goal = GoalRepository::new(pool).create(&goal).await?;

    tracing::info!(
        goal_id = %goal.goal_id,
        %athlete_id,
        created_by = %user.user_id(),
        "Goal created"
    );

    Ok(goal)
}

fn new_milestone(input: &MilestoneInput) -> Milestone {
    Milestone {
        title: input.title.clone(),
        target_value: input.target_value,
        achieved: false,
        achieved_at: None,
    }
}

pub async fn get_goal(pool: &PgPool, user: &AuthUser, goal_id: Uuid) -> ApiResult<Goal> {
    let (goal, athlete) = load_goal(pool, goal_id).await?;
    authorize(
        user,
        Permission::ViewGoal,
        Resource::Goal {
            goal: &goal,
            athlete: &athlete,
        },
    )?;
    Ok(goal)
}

/// Apply field edits. Progress is recomputed only when the target changes.
pub async fn update_goal(
    pool: &PgPool,
    user: &AuthUser,
    goal_id: Uuid,
    req: &UpdateGoalRequest,
) -> ApiResult<Goal> {
    let (mut goal, athlete) = load_goal(pool, goal_id).await?;
    authorize(
        user,
        Permission::EditGoal,
        Resource::Goal {
            goal: &goal,
            athlete: &athlete,
        },
    )?;

    let now = Utc::now();

    if let Some(title) = &req.title {
        goal.title = title.clone();
    }
    if let Some(description) = &req.description {
        goal.description = Some(description.clone());
    }
    if let Some(category) = req.category {
        goal.category = category;
    }
    if let Some(priority) = req.priority {
        goal.priority = priority;
    }
    if let Some(unit) = &req.unit {
        goal.target_metric.unit = Some(unit.clone());
    }
    if let Some(target_date) = req.target_date {
        if target_date < goal.start_date {
            return Err(WebError::BadRequest(
                "Target date must not be before start date".to_string(),
            ));
        }
        goal.target_date = target_date;
    }
    if let Some(editors) = &req.editors {
        goal.editors = editors.clone();
    }
    if let Some(viewers) = &req.viewers {
        goal.viewers = viewers.clone();
    }
    if let Some(target_value) = req.target_value {
        goal_progress::retarget(&mut goal, target_value, now)?;
    }
    match req.status {
        Some(status) => goal_progress::set_status(&mut goal, status, now)?,
        None => goal_progress::settle_status(&mut goal, now),
    }
    goal.updated_at = now;

    let goal = GoalRepository::new(pool).save(&goal).await?;

    tracing::info!(%goal_id, updated_by = %user.user_id(), "Goal updated");

    Ok(goal)
}

pub async fn delete_goal(pool: &PgPool, user: &AuthUser, goal_id: Uuid) -> ApiResult<()> {
    let (goal, athlete) = load_goal(pool, goal_id).await?;
    authorize(
        user,
        Permission::DeleteGoal,
        Resource::Goal {
            goal: &goal,
            athlete: &athlete,
        },
    )?;

    GoalRepository::new(pool).delete(goal_id).await?;

    tracing::info!(%goal_id, deleted_by = %user.user_id(), "Goal deleted");

    Ok(())
}

/// Run the progress engine for a new current value and persist the result
pub async fn record_progress(
    pool: &PgPool,
    user: &AuthUser,
    goal_id: Uuid,
    req: &ProgressUpdateRequest,
) -> ApiResult<Goal> {
    let (mut goal, athlete) = load_goal(pool, goal_id).await?;
    authorize(
        user,
        Permission::EditGoal,
        Resource::Goal {
            goal: &goal,
            athlete: &athlete,
        },
    )?;

    goal_progress::update_progress(
        &mut goal,
        req.value,
        req.notes.clone(),
        user.user_id(),
        Utc::now(),
    )?;

    let goal = GoalRepository::new(pool).save(&goal).await?;

    tracing::info!(
        %goal_id,
        percentage = goal.progress.percentage(),
        status = ?goal.status,
        "Goal progress recorded"
    );

    Ok(goal)
}

pub async fn add_milestone(
    pool: &PgPool,
    user: &AuthUser,
    goal_id: Uuid,
    req: &MilestoneInput,
) -> ApiResult<Goal> {
    let (mut goal, athlete) = load_goal(pool, goal_id).await?;
    authorize(
        user,
        Permission::EditGoal,
        Resource::Goal {
            goal: &goal,
            athlete: &athlete,
        },
    )?;

    goal_progress::add_milestone(&mut goal, req.title.clone(), req.target_value, Utc::now());

    let goal = GoalRepository::new(pool).save(&goal).await?;

    tracing::info!(%goal_id, added_by = %user.user_id(), "Milestone added");

    Ok(goal)
}

/// Coach review of a goal
pub async fn add_feedback(
    pool: &PgPool,
    user: &AuthUser,
    goal_id: Uuid,
    req: &FeedbackRequest,
) -> ApiResult<Goal> {
    let (mut goal, athlete) = load_goal(pool, goal_id).await?;
    authorize(
        user,
        Permission::ReviewGoal,
        Resource::Goal {
            goal: &goal,
            athlete: &athlete,
        },
    )?;

    goal_progress::add_feedback(
        &mut goal,
        user.user_id(),
        req.comment.clone(),
        req.rating,
        Utc::now(),
    )?;

    let goal = GoalRepository::new(pool).save(&goal).await?;

    tracing::info!(
        %goal_id,
        coach_id = %user.user_id(),
        rating = req.rating,
        "Goal feedback added"
    );

    Ok(goal)
}
