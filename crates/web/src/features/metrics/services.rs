use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::{
        common::Paginated,
        metric::{CreateMetricRequest, MetricFilter, MetricRecordResponse},
    },
    models::MetricRecord,
    repository::{AthleteRepository, MetricRepository},
    services::authorization::{Permission, Resource},
};
use uuid::Uuid;

use crate::error::{ApiResult, WebError};
use crate::middleware::auth::{AuthUser, authorize};

/// Paginated session history for an athlete
pub async fn list_metrics(
    pool: &PgPool,
    user: &AuthUser,
    athlete_id: Uuid,
    filter: &MetricFilter,
) -> ApiResult<Paginated<MetricRecordResponse>> {
    filter.validate().map_err(WebError::BadRequest)?;

    let athlete = AthleteRepository::new(pool).find_by_id(athlete_id).await?;
    authorize(user, Permission::ViewAthlete, Resource::Athlete(&athlete))?;

    let (records, total_items) = MetricRepository::new(pool).list(athlete_id, filter).await?;

    Ok(Paginated::new(
        records.into_iter().map(MetricRecordResponse::from).collect(),
        filter.page,
        filter.per_page,
        total_items,
    ))
}

/// Record one session. The stats must be for the athlete's sport.
pub async fn create_metric(
    pool: &PgPool,
    user: &AuthUser,
    athlete_id: Uuid,
    req: &CreateMetricRequest,
) -> ApiResult<MetricRecord> {
    let athlete = AthleteRepository::new(pool).find_by_id(athlete_id).await?;
    authorize(user, Permission::RecordMetrics, Resource::Athlete(&athlete))?;

    if req.stats.sport() != athlete.sport {
        return Err(WebError::BadRequest(format!(
            "Stats are for {} but the athlete plays {}",
            req.stats.sport(),
            athlete.sport
        )));
    }

    let record = MetricRepository::new(pool).create(athlete_id, req).await?;

    tracing::info!(
        record_id = %record.record_id,
        %athlete_id,
        recorded_by = %user.user_id(),
        "Metric record created"
    );

    Ok(record)
}

/// Delete a record. Verified records can only be removed by someone who may verify.
pub async fn delete_metric(pool: &PgPool, user: &AuthUser, record_id: Uuid) -> ApiResult<()> {
    let repo = MetricRepository::new(pool);
    let record = repo.find_by_id(record_id).await?;
    let athlete = AthleteRepository::new(pool)
        .find_by_id(record.athlete_id)
        .await?;

    let permission = if record.verified {
        Permission::VerifyMetrics
    } else {
        Permission::RecordMetrics
    };
    authorize(user, permission, Resource::Athlete(&athlete))?;

    repo.delete(record_id).await?;

    tracing::info!(%record_id, deleted_by = %user.user_id(), "Metric record deleted");

    Ok(())
}

/// Mark a record as verified by the athlete's coach (or an admin)
pub async fn verify_metric(
    pool: &PgPool,
    user: &AuthUser,
    record_id: Uuid,
) -> ApiResult<MetricRecord> {
    let repo = MetricRepository::new(pool);
    let record = repo.find_by_id(record_id).await?;
    let athlete = AthleteRepository::new(pool)
        .find_by_id(record.athlete_id)
        .await?;
    authorize(user, Permission::VerifyMetrics, Resource::Athlete(&athlete))?;

    if record.verified {
        return Err(WebError::BadRequest("Record is already verified".to_string()));
    }

    let record = repo.verify(record_id, user.user_id(), Utc::now()).await?;

    tracing::info!(%record_id, verified_by = %user.user_id(), "Metric record verified");

    Ok(record)
}
