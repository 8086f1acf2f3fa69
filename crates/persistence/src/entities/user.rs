//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::user::UserStats;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
///
/// Authentication lives in the external identity service; rows here exist
/// so the activism counters and foreign keys have a home.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub actions_joined: i64,
    pub actions_organized: i64,
    pub impact_score: i64,
    pub created_at: DateTime<Utc>,
}

/// The counters alone, for stats reads inside the engagement transaction.
#[derive(Debug, Clone, FromRow)]
pub struct UserStatsEntity {
    pub user_id: Uuid,
    pub actions_joined: i64,
    pub actions_organized: i64,
    pub impact_score: i64,
}

impl From<UserStatsEntity> for UserStats {
    fn from(entity: UserStatsEntity) -> Self {
        Self {
            user_id: entity.user_id,
            actions_joined: entity.actions_joined,
            actions_organized: entity.actions_organized,
            impact_score: entity.impact_score,
        }
    }
}
