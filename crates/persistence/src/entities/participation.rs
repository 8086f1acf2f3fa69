//! Participation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::participation::{Participation, ParticipationKind};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for participation_kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "participation_kind", rename_all = "snake_case")]
pub enum ParticipationKindDb {
    Registered,
    Attended,
    Completed,
    Cancelled,
}

impl From<ParticipationKindDb> for ParticipationKind {
    fn from(db: ParticipationKindDb) -> Self {
        match db {
            ParticipationKindDb::Registered => ParticipationKind::Registered,
            ParticipationKindDb::Attended => ParticipationKind::Attended,
            ParticipationKindDb::Completed => ParticipationKind::Completed,
            ParticipationKindDb::Cancelled => ParticipationKind::Cancelled,
        }
    }
}

impl From<ParticipationKind> for ParticipationKindDb {
    fn from(kind: ParticipationKind) -> Self {
        match kind {
            ParticipationKind::Registered => ParticipationKindDb::Registered,
            ParticipationKind::Attended => ParticipationKindDb::Attended,
            ParticipationKind::Completed => ParticipationKindDb::Completed,
            ParticipationKind::Cancelled => ParticipationKindDb::Cancelled,
        }
    }
}

/// Database row mapping for the action_participations table.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipationEntity {
    pub id: Uuid,
    pub action_id: Uuid,
    pub user_id: Uuid,
    pub kind: ParticipationKindDb,
    pub registered_at: DateTime<Utc>,
    pub rating: Option<i32>,
    pub feedback: Option<String>,
    pub contribution_hours: f64,
    pub contribution_description: Option<String>,
}

impl From<ParticipationEntity> for Participation {
    fn from(entity: ParticipationEntity) -> Self {
        Self {
            id: entity.id,
            action_id: entity.action_id,
            user_id: entity.user_id,
            kind: entity.kind.into(),
            registered_at: entity.registered_at,
            rating: entity.rating,
            feedback: entity.feedback,
            contribution_hours: entity.contribution_hours,
            contribution_description: entity.contribution_description,
        }
    }
}
