//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod achievement;
pub mod action;
pub mod activity;
pub mod participation;
pub mod user;

pub use achievement::{AchievementEntity, AchievementTypeDb};
pub use action::{ActionStatusDb, ActionTypeDb, ActionWithCountEntity, ClimateActionEntity};
pub use activity::DailyActivityEntity;
pub use participation::{ParticipationEntity, ParticipationKindDb};
pub use user::{UserEntity, UserStatsEntity};
