//! Achievement entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::achievement::{Achievement, AchievementType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for achievement_type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "achievement_type", rename_all = "snake_case")]
pub enum AchievementTypeDb {
    ClimateChampion,
    CommunityBuilder,
    CitizenScientist,
    Organizer,
    Mentor,
    Advocate,
}

impl From<AchievementTypeDb> for AchievementType {
    fn from(db: AchievementTypeDb) -> Self {
        match db {
            AchievementTypeDb::ClimateChampion => AchievementType::ClimateChampion,
            AchievementTypeDb::CommunityBuilder => AchievementType::CommunityBuilder,
            AchievementTypeDb::CitizenScientist => AchievementType::CitizenScientist,
            AchievementTypeDb::Organizer => AchievementType::Organizer,
            AchievementTypeDb::Mentor => AchievementType::Mentor,
            AchievementTypeDb::Advocate => AchievementType::Advocate,
        }
    }
}

impl From<AchievementType> for AchievementTypeDb {
    fn from(t: AchievementType) -> Self {
        match t {
            AchievementType::ClimateChampion => AchievementTypeDb::ClimateChampion,
            AchievementType::CommunityBuilder => AchievementTypeDb::CommunityBuilder,
            AchievementType::CitizenScientist => AchievementTypeDb::CitizenScientist,
            AchievementType::Organizer => AchievementTypeDb::Organizer,
            AchievementType::Mentor => AchievementTypeDb::Mentor,
            AchievementType::Advocate => AchievementTypeDb::Advocate,
        }
    }
}

/// Database row mapping for the user_achievements table.
#[derive(Debug, Clone, FromRow)]
pub struct AchievementEntity {
    pub user_id: Uuid,
    pub achievement_type: AchievementTypeDb,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub date_earned: DateTime<Utc>,
}

impl From<AchievementEntity> for Achievement {
    fn from(entity: AchievementEntity) -> Self {
        Self {
            user_id: entity.user_id,
            achievement_type: entity.achievement_type.into(),
            name: entity.name,
            description: entity.description,
            icon: entity.icon,
            date_earned: entity.date_earned,
        }
    }
}
