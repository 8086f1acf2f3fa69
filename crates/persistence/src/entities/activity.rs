//! Daily activity entity (database row mapping).

use chrono::NaiveDate;
use domain::models::activity::DailyActivity;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the user_activities table.
#[derive(Debug, Clone, FromRow)]
pub struct DailyActivityEntity {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub action_count: i32,
    pub contribution_level: i16,
}

impl From<DailyActivityEntity> for DailyActivity {
    fn from(entity: DailyActivityEntity) -> Self {
        Self {
            user_id: entity.user_id,
            date: entity.date,
            action_count: entity.action_count,
            contribution_level: entity.contribution_level,
        }
    }
}
