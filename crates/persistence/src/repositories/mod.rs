//! Repository implementations for database access.
//!
//! Repositories own a pool for standalone reads. Operations that belong to
//! the engagement engine's atomic unit take a `&mut PgConnection` borrowed
//! from the caller's transaction instead, so capacity checks, inserts,
//! activity upserts and achievement grants commit or roll back together.

pub mod achievement;
pub mod action;
pub mod activity;
pub mod participation;
pub mod user;

pub use achievement::AchievementRepository;
pub use action::ActionRepository;
pub use activity::ActivityRepository;
pub use participation::ParticipationRepository;
pub use user::UserRepository;
