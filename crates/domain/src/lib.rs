//! Domain layer for the Baltic Climate backend.
//!
//! This crate contains:
//! - Domain models (ClimateAction, Participation, DailyActivity, Achievement)
//! - Pure engagement policy (contribution levels, impact scoring,
//!   achievement thresholds, the join gate)
//! - Domain error types

pub mod models;
pub mod services;
