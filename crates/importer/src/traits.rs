use crate::Result;
use storage::{dto::metric::CreateMetricRequest, models::Sport};
use uuid::Uuid;

/// Where validated records end up.
#[async_trait::async_trait]
pub trait RecordSink: Send + Sync {
    /// Sport on the athlete's profile, if the sink can look it up.
    async fn athlete_sport(&self, athlete_id: Uuid) -> Result<Option<Sport>>;

    /// Writes all records or none; returns how many were written.
    async fn write(&self, athlete_id: Uuid, records: &[CreateMetricRequest]) -> Result<usize>;
}
