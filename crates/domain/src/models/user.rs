//! User-facing statistics models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cumulative activism counters for a user. Maintained exclusively by the
/// engagement engine; never client-writable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserStats {
    pub user_id: Uuid,
    pub actions_joined: i64,
    pub actions_organized: i64,
    pub impact_score: i64,
}
