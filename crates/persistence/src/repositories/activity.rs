//! Daily activity repository.

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::DailyActivityEntity;
use crate::metrics::QueryTimer;

/// Repository for the per-(user, day) activity aggregates.
#[derive(Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Creates a new ActivityRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically apply `delta` to the day's action count, floored at zero.
    /// Creates the row on first activity of the day. Returns the new count.
    pub async fn increment(
        &self,
        tx: &mut PgConnection,
        user_id: Uuid,
        date: NaiveDate,
        delta: i32,
    ) -> Result<i32, sqlx::Error> {
        let timer = QueryTimer::new("increment_daily_activity");
        let result = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO user_activities (user_id, date, action_count)
            VALUES ($1, $2, GREATEST($3, 0))
            ON CONFLICT (user_id, date)
            DO UPDATE SET action_count = GREATEST(user_activities.action_count + $3, 0)
            RETURNING action_count
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(delta)
        .fetch_one(&mut *tx)
        .await;
        timer.record();
        result
    }

    /// Store the contribution level derived from the day's new count.
    /// The level itself comes from the engagement policy, not from SQL.
    pub async fn set_level(
        &self,
        tx: &mut PgConnection,
        user_id: Uuid,
        date: NaiveDate,
        contribution_level: i16,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("set_daily_activity_level");
        let result = sqlx::query(
            r#"
            UPDATE user_activities
            SET contribution_level = $3
            WHERE user_id = $1 AND date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(contribution_level)
        .execute(&mut *tx)
        .await
        .map(|_| ());
        timer.record();
        result
    }

    /// Activity rows for a user in `[from, to]`, ascending by date.
    pub async fn range(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyActivityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("daily_activity_range");
        let result = sqlx::query_as::<_, DailyActivityEntity>(
            r#"
            SELECT user_id, date, action_count, contribution_level
            FROM user_activities
            WHERE user_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All dates a user was active on, ascending, for streak derivation.
    pub async fn active_dates<'e>(
        &self,
        executor: impl sqlx::PgExecutor<'e>,
        user_id: Uuid,
    ) -> Result<Vec<NaiveDate>, sqlx::Error> {
        let timer = QueryTimer::new("daily_activity_dates");
        let result = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT date FROM user_activities
            WHERE user_id = $1 AND action_count > 0
            ORDER BY date
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await;
        timer.record();
        result
    }
}
