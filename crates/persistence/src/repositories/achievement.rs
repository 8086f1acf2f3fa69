//! Achievement repository.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{AchievementEntity, AchievementTypeDb};
use crate::metrics::QueryTimer;

/// Repository for granted achievements.
#[derive(Clone)]
pub struct AchievementRepository {
    pool: PgPool,
}

impl AchievementRepository {
    /// Creates a new AchievementRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grant an achievement unless the user already holds it.
    ///
    /// The (user, type) primary key makes concurrent double-grants a silent
    /// no-op: the losing insert conflicts and is skipped. Returns true when
    /// this call created the row.
    pub async fn grant_if_absent(
        &self,
        tx: &mut PgConnection,
        user_id: Uuid,
        achievement_type: AchievementTypeDb,
        name: &str,
        description: &str,
        icon: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("grant_achievement");
        let result = sqlx::query(
            r#"
            INSERT INTO user_achievements (user_id, achievement_type, name, description, icon)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, achievement_type) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(achievement_type)
        .bind(name)
        .bind(description)
        .bind(icon)
        .execute(&mut *tx)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// A user's achievements, most recent first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<AchievementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_achievements");
        let result = sqlx::query_as::<_, AchievementEntity>(
            r#"
            SELECT user_id, achievement_type, name, description, icon, date_earned
            FROM user_achievements
            WHERE user_id = $1
            ORDER BY date_earned DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
