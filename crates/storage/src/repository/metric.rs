use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, types::Json};
use uuid::Uuid;

use crate::dto::analytics::ReportPeriod;
use crate::dto::metric::{CreateMetricRequest, MetricFilter};
use crate::error::{Result, StorageError};
use crate::models::{MetricRecord, SessionType, Sport, SportStats};

const METRIC_COLUMNS: &str = "record_id, athlete_id, session_date, session_type, opponent, notes, \
     stats, verified, verified_by, verified_at, created_at";

#[derive(Debug, FromRow)]
struct MetricRow {
    record_id: Uuid,
    athlete_id: Uuid,
    session_date: NaiveDate,
    session_type: SessionType,
    opponent: Option<String>,
    notes: Option<String>,
    stats: Json<SportStats>,
    verified: bool,
    verified_by: Option<Uuid>,
    verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<MetricRow> for MetricRecord {
    fn from(row: MetricRow) -> Self {
        Self {
            record_id: row.record_id,
            athlete_id: row.athlete_id,
            session_date: row.session_date,
            session_type: row.session_type,
            opponent: row.opponent,
            notes: row.notes,
            stats: row.stats.0,
            verified: row.verified,
            verified_by: row.verified_by,
            verified_at: row.verified_at,
            created_at: row.created_at,
        }
    }
}

pub struct MetricRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MetricRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Paginated session history, newest first
    pub async fn list(
        &self,
        athlete_id: Uuid,
        filter: &MetricFilter,
    ) -> Result<(Vec<MetricRecord>, i64)> {
        let total_items = self.count(athlete_id, filter).await?;

        let mut query = QueryBuilder::new(format!(
            "SELECT {METRIC_COLUMNS} FROM metric_records WHERE athlete_id = "
        ));
        query.push_bind(athlete_id);
        push_filters(&mut query, filter.sport, filter.session_type, filter.from, filter.to);
        query.push(" ORDER BY session_date DESC, created_at DESC LIMIT ");
        query.push_bind(filter.limit());
        query.push(" OFFSET ");
        query.push_bind(filter.offset());

        let rows: Vec<MetricRow> = query.build_query_as().fetch_all(self.pool).await?;

        Ok((rows.into_iter().map(MetricRecord::from).collect(), total_items))
    }

    async fn count(&self, athlete_id: Uuid, filter: &MetricFilter) -> Result<i64> {
        let mut query =
            QueryBuilder::new("SELECT COUNT(*) FROM metric_records WHERE athlete_id = ");
        query.push_bind(athlete_id);
        push_filters(&mut query, filter.sport, filter.session_type, filter.from, filter.to);

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Total recorded sessions for an athlete
    pub async fn count_for_athlete(&self, athlete_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM metric_records WHERE athlete_id = $1",
        )
        .bind(athlete_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Every session in a period for one sport, oldest first
    pub async fn find_in_period(
        &self,
        athlete_id: Uuid,
        sport: Sport,
        period: ReportPeriod,
    ) -> Result<Vec<MetricRecord>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {METRIC_COLUMNS} FROM metric_records WHERE athlete_id = "
        ));
        query.push_bind(athlete_id);
        push_filters(&mut query, Some(sport), None, period.from, period.to);
        query.push(" ORDER BY session_date ASC, created_at ASC");

        let rows: Vec<MetricRow> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(rows.into_iter().map(MetricRecord::from).collect())
    }

    /// Find record by ID
    pub async fn find_by_id(&self, record_id: Uuid) -> Result<MetricRecord> {
        let row = sqlx::query_as::<_, MetricRow>(&format!(
            "SELECT {METRIC_COLUMNS} FROM metric_records WHERE record_id = $1"
        ))
        .bind(record_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    /// Record one session
    pub async fn create(
        &self,
        athlete_id: Uuid,
        req: &CreateMetricRequest,
    ) -> Result<MetricRecord> {
        let row = sqlx::query_as::<_, MetricRow>(&format!(
            r#"
            INSERT INTO metric_records (athlete_id, session_date, session_type, sport, opponent, notes, stats)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {METRIC_COLUMNS}
            "#
        ))
        .bind(athlete_id)
        .bind(req.session_date)
        .bind(req.session_type)
        .bind(req.stats.sport())
        .bind(&req.opponent)
        .bind(&req.notes)
        .bind(Json(&req.stats))
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).classify("metric record"))?;

        Ok(row.into())
    }

    /// Insert a batch of sessions atomically; nothing is written if any row fails.
    pub async fn create_many(
        &self,
        athlete_id: Uuid,
        records: &[CreateMetricRequest],
    ) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        for req in records {
            sqlx::query(
                r#"
                INSERT INTO metric_records (athlete_id, session_date, session_type, sport, opponent, notes, stats)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(athlete_id)
            .bind(req.session_date)
            .bind(req.session_type)
            .bind(req.stats.sport())
            .bind(&req.opponent)
            .bind(&req.notes)
            .bind(Json(&req.stats))
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::from(e).classify("metric record"))?;
        }

        tx.commit().await?;

        Ok(records.len())
    }

    /// Mark a record as verified by a coach
    pub async fn verify(
        &self,
        record_id: Uuid,
        verified_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<MetricRecord> {
        let row = sqlx::query_as::<_, MetricRow>(&format!(
            r#"
            UPDATE metric_records
            SET verified = true, verified_by = $2, verified_at = $3
            WHERE record_id = $1
            RETURNING {METRIC_COLUMNS}
            "#
        ))
        .bind(record_id)
        .bind(verified_by)
        .bind(now)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a record by ID
    pub async fn delete(&self, record_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM metric_records WHERE record_id = $1")
            .bind(record_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn push_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    sport: Option<Sport>,
    session_type: Option<SessionType>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) {
    if let Some(sport) = sport {
        query.push(" AND sport = ");
        query.push_bind(sport);
    }

    if let Some(session_type) = session_type {
        query.push(" AND session_type = ");
        query.push_bind(session_type);
    }

    if let Some(from) = from {
        query.push(" AND session_date >= ");
        query.push_bind(from);
    }

    if let Some(to) = to {
        query.push(" AND session_date <= ");
        query.push_bind(to);
    }
}
