//! Participation repository.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{ParticipationEntity, ParticipationKindDb};
use crate::metrics::QueryTimer;

const PARTICIPATION_COLUMNS: &str = "id, action_id, user_id, kind, registered_at, rating, \
     feedback, contribution_hours, contribution_description";

/// Repository for action participation rows.
#[derive(Clone)]
pub struct ParticipationRepository {
    pool: PgPool,
}

impl ParticipationRepository {
    /// Creates a new ParticipationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the non-cancelled participation for (user, action), if any.
    pub async fn find_active<'e>(
        &self,
        executor: impl sqlx::PgExecutor<'e>,
        action_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ParticipationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_participation");
        let result = sqlx::query_as::<_, ParticipationEntity>(&format!(
            r#"
            SELECT {PARTICIPATION_COLUMNS} FROM action_participations
            WHERE action_id = $1 AND user_id = $2 AND kind <> 'cancelled'
            "#
        ))
        .bind(action_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await;
        timer.record();
        result
    }

    /// Insert a fresh registration.
    ///
    /// A concurrent duplicate surfaces as a unique violation on
    /// `uq_active_participation`; the caller maps that to AlreadyJoined.
    pub async fn insert_registered(
        &self,
        tx: &mut PgConnection,
        action_id: Uuid,
        user_id: Uuid,
    ) -> Result<ParticipationEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_participation");
        let result = sqlx::query_as::<_, ParticipationEntity>(&format!(
            r#"
            INSERT INTO action_participations (action_id, user_id, kind)
            VALUES ($1, $2, 'registered')
            RETURNING {PARTICIPATION_COLUMNS}
            "#
        ))
        .bind(action_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await;
        timer.record();
        result
    }

    /// Mark a participation cancelled, freeing its capacity slot.
    pub async fn cancel(
        &self,
        tx: &mut PgConnection,
        participation_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("cancel_participation");
        let result = sqlx::query(
            r#"
            UPDATE action_participations
            SET kind = 'cancelled'
            WHERE id = $1 AND kind <> 'cancelled'
            "#,
        )
        .bind(participation_id)
        .execute(&mut *tx)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Record a post-event outcome. Absent fields keep their stored values.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_outcome(
        &self,
        tx: &mut PgConnection,
        participation_id: Uuid,
        kind: ParticipationKindDb,
        rating: Option<i32>,
        contribution_hours: Option<f64>,
        feedback: Option<&str>,
        contribution_description: Option<&str>,
    ) -> Result<ParticipationEntity, sqlx::Error> {
        let timer = QueryTimer::new("record_participation_outcome");
        let result = sqlx::query_as::<_, ParticipationEntity>(&format!(
            r#"
            UPDATE action_participations
            SET kind = $2,
                rating = COALESCE($3, rating),
                contribution_hours = COALESCE($4, contribution_hours),
                feedback = COALESCE($5, feedback),
                contribution_description = COALESCE($6, contribution_description)
            WHERE id = $1
            RETURNING {PARTICIPATION_COLUMNS}
            "#
        ))
        .bind(participation_id)
        .bind(kind)
        .bind(rating)
        .bind(contribution_hours)
        .bind(feedback)
        .bind(contribution_description)
        .fetch_one(&mut *tx)
        .await;
        timer.record();
        result
    }

    /// Count a user's non-cancelled participations in citizen science
    /// actions, for the citizen_scientist achievement.
    pub async fn citizen_science_count<'e>(
        &self,
        executor: impl sqlx::PgExecutor<'e>,
        user_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("citizen_science_count");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM action_participations p
            JOIN climate_actions a ON a.id = p.action_id
            WHERE p.user_id = $1
              AND p.kind <> 'cancelled'
              AND a.action_type = 'citizen_science'
            "#,
        )
        .bind(user_id)
        .fetch_one(executor)
        .await;
        timer.record();
        result
    }

    /// Non-cancelled participations for an action, oldest registration first.
    pub async fn list_for_action(
        &self,
        action_id: Uuid,
    ) -> Result<Vec<ParticipationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_participations_for_action");
        let result = sqlx::query_as::<_, ParticipationEntity>(&format!(
            r#"
            SELECT {PARTICIPATION_COLUMNS} FROM action_participations
            WHERE action_id = $1 AND kind <> 'cancelled'
            ORDER BY registered_at
            "#
        ))
        .bind(action_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
