//! Persistence layer for the Baltic Climate backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the transaction-scoped
//!   operations the engagement engine composes into one atomic unit

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
