pub mod athlete;
pub mod goal;
pub mod metric;
pub mod sport;
pub mod team;
pub mod user;

pub use athlete::Athlete;
pub use goal::{
    CoachFeedback, Direction, Goal, GoalCategory, GoalPriority, GoalProgress, GoalStatus,
    Milestone, ProgressUpdate, TargetMetric,
};
pub use metric::{
    BaseballStats, BasketballStats, FootballStats, MetricRecord, SessionType, SoccerStats,
    SportStats, VolleyballStats,
};
pub use sport::Sport;
pub use team::Team;
pub use user::{Role, User};
