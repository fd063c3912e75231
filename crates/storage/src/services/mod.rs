pub mod analytics;
pub mod authorization;
pub mod goal_progress;
pub mod ratio;
pub mod report;
