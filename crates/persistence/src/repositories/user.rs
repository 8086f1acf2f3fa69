//! User repository: activism counters and stats reads.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{UserEntity, UserStatsEntity};
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str =
    "id, email, display_name, actions_joined, actions_organized, impact_score, created_at";

/// Repository for user rows.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user row. Invoked when the identity service first
    /// provisions an account (and by test fixtures).
    pub async fn create(
        &self,
        email: &str,
        display_name: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (email, display_name)
            VALUES ($1, $2)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The activism counters for a user.
    pub async fn stats<'e>(
        &self,
        executor: impl sqlx::PgExecutor<'e>,
        user_id: Uuid,
    ) -> Result<Option<UserStatsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("user_stats");
        let result = sqlx::query_as::<_, UserStatsEntity>(
            r#"
            SELECT id AS user_id, actions_joined, actions_organized, impact_score
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await;
        timer.record();
        result
    }

    /// Bump the joined counter by one.
    pub async fn increment_actions_joined(
        &self,
        tx: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("increment_actions_joined");
        let result = sqlx::query("UPDATE users SET actions_joined = actions_joined + 1 WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map(|_| ());
        timer.record();
        result
    }

    /// Bump the organized counter by one.
    pub async fn increment_actions_organized(
        &self,
        tx: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("increment_actions_organized");
        let result =
            sqlx::query("UPDATE users SET actions_organized = actions_organized + 1 WHERE id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map(|_| ());
        timer.record();
        result
    }

    /// Add impact points earned from logged contribution hours.
    pub async fn add_impact_score(
        &self,
        tx: &mut PgConnection,
        user_id: Uuid,
        points: i64,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("add_impact_score");
        let result = sqlx::query("UPDATE users SET impact_score = impact_score + $2 WHERE id = $1")
            .bind(user_id)
            .bind(points)
            .execute(&mut *tx)
            .await
            .map(|_| ());
        timer.record();
        result
    }
}
