//! Capability checks: one pure function deciding whether an actor may
//! perform an action on a resource.

use uuid::Uuid;

use crate::models::{Athlete, Goal, Role, Team, User};

/// Authenticated caller as seen by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ViewAthlete,
    ManageAthlete,
    RecordMetrics,
    VerifyMetrics,
    CreateGoal,
    ViewGoal,
    EditGoal,
    DeleteGoal,
    ReviewGoal,
    ViewTeam,
}

#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Athlete(&'a Athlete),
    Goal {
        goal: &'a Goal,
        athlete: &'a Athlete,
    },
    Team(&'a Team),
}

pub fn is_allowed(actor: &Actor, permission: Permission, resource: Resource<'_>) -> bool {
    if actor.role == Role::Admin {
        return true;
    }

    match resource {
        Resource::Athlete(athlete) => athlete_allows(actor, permission, athlete),
        Resource::Goal { goal, athlete } => goal_allows(actor, permission, goal, athlete),
        Resource::Team(team) => team_allows(actor, permission, team),
    }
}

fn coaches(actor: &Actor, athlete: &Athlete) -> bool {
    actor.role == Role::Coach && athlete.coach_id == Some(actor.user_id)
}

fn athlete_allows(actor: &Actor, permission: Permission, athlete: &Athlete) -> bool {
    let is_self = actor.user_id == athlete.athlete_id;
    let is_coach = coaches(actor, athlete);

    match permission {
        Permission::ViewAthlete
        | Permission::ManageAthlete
        | Permission::RecordMetrics
        | Permission::CreateGoal => is_self || is_coach,
        Permission::VerifyMetrics => is_coach,
        _ => false,
    }
}

fn goal_allows(actor: &Actor, permission: Permission, goal: &Goal, athlete: &Athlete) -> bool {
    let is_owner = actor.user_id == goal.athlete_id;
    let is_creator = actor.user_id == goal.created_by;
    let is_editor = goal.is_editor(actor.user_id);
    let is_coach = coaches(actor, athlete);

    match permission {
        Permission::ViewGoal => {
            is_owner || is_creator || is_editor || goal.is_viewer(actor.user_id) || is_coach
        }
        Permission::EditGoal => is_owner || is_creator || is_editor,
        Permission::DeleteGoal => is_creator || is_editor,
        Permission::ReviewGoal => is_coach,
        _ => false,
    }
}

fn team_allows(actor: &Actor, permission: Permission, team: &Team) -> bool {
    match permission {
        Permission::ViewTeam => actor.role == Role::Coach && team.coach_id == Some(actor.user_id),
        _ => false,
    }
}
