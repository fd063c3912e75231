use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::athlete::{CreateAthleteRequest, UpdateAthleteRequest};
use crate::error::{Result, StorageError};
use crate::models::{Athlete, Role};

const ATHLETE_COLUMNS: &str = r#"
    a.athlete_id, u.first_name, u.last_name, u.email, a.sport, a.position,
    a.team_id, a.coach_id, a.jersey_number, a.date_of_birth, a.created_at
"#;

pub struct AthleteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AthleteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the athletes a user may see: admins see all, coaches their own
    /// roster, athletes only themselves.
    pub async fn list_visible(&self, user_id: Uuid, role: Role) -> Result<Vec<Athlete>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {ATHLETE_COLUMNS} FROM athletes a \
             JOIN users u ON u.user_id = a.athlete_id \
             WHERE 1=1"
        ));

        match role {
            Role::Admin => {}
            Role::Coach => {
                query.push(" AND a.coach_id = ");
                query.push_bind(user_id);
            }
            Role::Athlete => {
                query.push(" AND a.athlete_id = ");
                query.push_bind(user_id);
            }
        }

        query.push(" ORDER BY u.last_name, u.first_name");

        let athletes: Vec<Athlete> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(athletes)
    }

    /// Find athlete by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Athlete> {
        let sql = format!(
            "SELECT {ATHLETE_COLUMNS} FROM athletes a \
             JOIN users u ON u.user_id = a.athlete_id \
             WHERE a.athlete_id = $1"
        );

        sqlx::query_as::<_, Athlete>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Athletes on a team's roster
    pub async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Athlete>> {
        let sql = format!(
            "SELECT {ATHLETE_COLUMNS} FROM athletes a \
             JOIN users u ON u.user_id = a.athlete_id \
             WHERE a.team_id = $1 \
             ORDER BY u.last_name, u.first_name"
        );

        let athletes = sqlx::query_as::<_, Athlete>(&sql)
            .bind(team_id)
            .fetch_all(self.pool)
            .await?;

        Ok(athletes)
    }

    /// Create an athlete profile for an existing user
    pub async fn create(&self, user_id: Uuid, req: &CreateAthleteRequest) -> Result<Athlete> {
        sqlx::query(
            r#"
            INSERT INTO athletes (athlete_id, sport, position, team_id, coach_id, jersey_number, date_of_birth)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user_id)
        .bind(req.sport)
        .bind(&req.position)
        .bind(req.team_id)
        .bind(req.coach_id)
        .bind(req.jersey_number)
        .bind(req.date_of_birth)
        .execute(self.pool)
        .await
        .map_err(|e| StorageError::from(e).classify("athlete profile"))?;

        self.find_by_id(user_id).await
    }

    /// Update an existing athlete
    pub async fn update(
        &self,
        existing: &Athlete,
        req: &UpdateAthleteRequest,
    ) -> Result<Athlete> {
        let sport = req.sport.unwrap_or(existing.sport);
        let position = req.position.as_ref().or(existing.position.as_ref());
        let team_id = req.team_id.or(existing.team_id);
        let coach_id = req.coach_id.or(existing.coach_id);
        let jersey_number = req.jersey_number.or(existing.jersey_number);
        let date_of_birth = req.date_of_birth.or(existing.date_of_birth);

        let result = sqlx::query(
            r#"
            UPDATE athletes
            SET sport = $2,
                position = $3,
                team_id = $4,
                coach_id = $5,
                jersey_number = $6,
                date_of_birth = $7
            WHERE athlete_id = $1
            "#,
        )
        .bind(existing.athlete_id)
        .bind(sport)
        .bind(position)
        .bind(team_id)
        .bind(coach_id)
        .bind(jersey_number)
        .bind(date_of_birth)
        .execute(self.pool)
        .await
        .map_err(|e| StorageError::from(e).classify("athlete profile"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.find_by_id(existing.athlete_id).await
    }
}
