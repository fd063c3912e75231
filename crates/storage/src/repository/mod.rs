pub mod athlete;
pub mod goal;
pub mod metric;
pub mod team;
pub mod user;

pub use athlete::AthleteRepository;
pub use goal::GoalRepository;
pub use metric::MetricRepository;
pub use team::TeamRepository;
pub use user::UserRepository;
