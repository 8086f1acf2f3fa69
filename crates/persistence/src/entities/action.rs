//! Climate action entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::action::{ActionStatus, ActionType, ClimateAction};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for action_type that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "action_type", rename_all = "snake_case")]
pub enum ActionTypeDb {
    CitizenScience,
    ClimateAssembly,
    LifestyleChange,
    Workshop,
    NgoInitiative,
    ResourceSharing,
    ParticipatoryBudgeting,
    Hackathon,
    Protest,
    Seminar,
}

impl From<ActionTypeDb> for ActionType {
    fn from(db: ActionTypeDb) -> Self {
        match db {
            ActionTypeDb::CitizenScience => ActionType::CitizenScience,
            ActionTypeDb::ClimateAssembly => ActionType::ClimateAssembly,
            ActionTypeDb::LifestyleChange => ActionType::LifestyleChange,
            ActionTypeDb::Workshop => ActionType::Workshop,
            ActionTypeDb::NgoInitiative => ActionType::NgoInitiative,
            ActionTypeDb::ResourceSharing => ActionType::ResourceSharing,
            ActionTypeDb::ParticipatoryBudgeting => ActionType::ParticipatoryBudgeting,
            ActionTypeDb::Hackathon => ActionType::Hackathon,
            ActionTypeDb::Protest => ActionType::Protest,
            ActionTypeDb::Seminar => ActionType::Seminar,
        }
    }
}

impl From<ActionType> for ActionTypeDb {
    fn from(t: ActionType) -> Self {
        match t {
            ActionType::CitizenScience => ActionTypeDb::CitizenScience,
            ActionType::ClimateAssembly => ActionTypeDb::ClimateAssembly,
            ActionType::LifestyleChange => ActionTypeDb::LifestyleChange,
            ActionType::Workshop => ActionTypeDb::Workshop,
            ActionType::NgoInitiative => ActionTypeDb::NgoInitiative,
            ActionType::ResourceSharing => ActionTypeDb::ResourceSharing,
            ActionType::ParticipatoryBudgeting => ActionTypeDb::ParticipatoryBudgeting,
            ActionType::Hackathon => ActionTypeDb::Hackathon,
            ActionType::Protest => ActionTypeDb::Protest,
            ActionType::Seminar => ActionTypeDb::Seminar,
        }
    }
}

/// Database enum for action_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "action_status", rename_all = "snake_case")]
pub enum ActionStatusDb {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl From<ActionStatusDb> for ActionStatus {
    fn from(db: ActionStatusDb) -> Self {
        match db {
            ActionStatusDb::Upcoming => ActionStatus::Upcoming,
            ActionStatusDb::Ongoing => ActionStatus::Ongoing,
            ActionStatusDb::Completed => ActionStatus::Completed,
            ActionStatusDb::Cancelled => ActionStatus::Cancelled,
        }
    }
}

impl From<ActionStatus> for ActionStatusDb {
    fn from(s: ActionStatus) -> Self {
        match s {
            ActionStatus::Upcoming => ActionStatusDb::Upcoming,
            ActionStatus::Ongoing => ActionStatusDb::Ongoing,
            ActionStatus::Completed => ActionStatusDb::Completed,
            ActionStatus::Cancelled => ActionStatusDb::Cancelled,
        }
    }
}

/// Database row mapping for the climate_actions table.
#[derive(Debug, Clone, FromRow)]
pub struct ClimateActionEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub action_type: ActionTypeDb,
    pub status: ActionStatusDb,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub city: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer_id: Uuid,
    pub organization_name: Option<String>,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClimateActionEntity> for ClimateAction {
    fn from(entity: ClimateActionEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            action_type: entity.action_type.into(),
            status: entity.status.into(),
            location_name: entity.location_name,
            latitude: entity.latitude,
            longitude: entity.longitude,
            country: entity.country,
            city: entity.city,
            start_time: entity.start_time,
            end_time: entity.end_time,
            organizer_id: entity.organizer_id,
            organization_name: entity.organization_name,
            max_participants: entity.max_participants,
            registration_deadline: entity.registration_deadline,
            tags: entity.tags,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Action row with its derived participant count, for listings and detail.
#[derive(Debug, Clone, FromRow)]
pub struct ActionWithCountEntity {
    #[sqlx(flatten)]
    pub action: ClimateActionEntity,
    pub participant_count: i64,
}
