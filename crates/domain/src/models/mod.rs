//! Domain models for the Baltic Climate backend.

pub mod achievement;
pub mod action;
pub mod activity;
pub mod participation;
pub mod user;

pub use achievement::{Achievement, AchievementType};
pub use action::{ActionStatus, ActionType, ClimateAction};
pub use activity::{CalendarEntry, DailyActivity};
pub use participation::{Participation, ParticipationError, ParticipationKind};
pub use user::UserStats;
