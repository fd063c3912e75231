use crate::traits::RecordSink;
use crate::{ImporterError, Result};
use sqlx::PgPool;
use storage::{
    dto::metric::CreateMetricRequest,
    error::StorageError,
    models::Sport,
    repository::{AthleteRepository, MetricRepository},
};
use uuid::Uuid;

/// Inserts records into Postgres in a single transaction.
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecordSink for PostgresSink {
    async fn athlete_sport(&self, athlete_id: Uuid) -> Result<Option<Sport>> {
        match AthleteRepository::new(&self.pool).find_by_id(athlete_id).await {
            Ok(athlete) => Ok(Some(athlete.sport)),
            Err(StorageError::NotFound) => Err(ImporterError::ImportError(format!(
                "No athlete profile for {}",
                athlete_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, athlete_id: Uuid, records: &[CreateMetricRequest]) -> Result<usize> {
        let written = MetricRepository::new(&self.pool)
            .create_many(athlete_id, records)
            .await?;
        Ok(written)
    }
}

/// Validates only; nothing is written.
pub struct DryRunSink;

#[async_trait::async_trait]
impl RecordSink for DryRunSink {
    async fn athlete_sport(&self, _athlete_id: Uuid) -> Result<Option<Sport>> {
        Ok(None)
    }

    async fn write(&self, athlete_id: Uuid, records: &[CreateMetricRequest]) -> Result<usize> {
        tracing::debug!(%athlete_id, records = records.len(), "Dry run, skipping write");
        Ok(0)
    }
}
