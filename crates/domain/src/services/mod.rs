//! Pure business logic services.

pub mod engagement;

pub use engagement::{ensure_can_join, longest_streak, EngagementPolicy, EngagementStats};
