//! Participation domain models and error kinds.
//!
//! A participation is one user's relationship to one action. At most one
//! non-cancelled participation may exist per (user, action); cancelled rows
//! stay behind as history and never block a rejoin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// State of a user's participation in an action.
///
/// The forward path is registered → attended → completed. Cancellation is
/// reachable from registered or attended only; a completed participation is
/// final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationKind {
    Registered,
    Attended,
    Completed,
    Cancelled,
}

impl ParticipationKind {
    /// Whether `self → to` is a valid transition.
    pub fn can_transition_to(self, to: ParticipationKind) -> bool {
        use ParticipationKind::*;
        matches!(
            (self, to),
            (Registered, Attended)
                | (Attended, Completed)
                | (Registered, Cancelled)
                | (Attended, Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Attended => "attended",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ParticipationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's participation record for one action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Participation {
    pub id: Uuid,
    pub action_id: Uuid,
    pub user_id: Uuid,
    pub kind: ParticipationKind,
    pub registered_at: DateTime<Utc>,
    /// 1-5 rating left after the event.
    pub rating: Option<i32>,
    pub feedback: Option<String>,
    pub contribution_hours: f64,
    pub contribution_description: Option<String>,
}

/// Request to record a post-event outcome (attended/completed/cancelled).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct OutcomeRequest {
    pub kind: ParticipationKind,

    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: Option<i32>,

    #[validate(range(min = 0.0, message = "contribution_hours must not be negative"))]
    pub contribution_hours: Option<f64>,

    #[validate(length(max = 2000))]
    pub feedback: Option<String>,

    #[validate(length(max = 2000))]
    pub contribution_description: Option<String>,
}

/// Tagged error kinds for participation operations.
///
/// These cross the module boundary as values, never as opaque panics; the
/// API layer maps each kind to a response status.
#[derive(Debug, Error)]
pub enum ParticipationError {
    #[error("Action or participation not found")]
    NotFound,

    #[error("Already registered for this action")]
    AlreadyJoined,

    #[error("Registration deadline has passed")]
    RegistrationClosed,

    #[error("Action is full")]
    Full,

    #[error("Invalid participation transition: {from} -> {to}")]
    InvalidTransition { from: ParticipationKind, to: ParticipationKind },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ParticipationKind::*;

    #[test]
    fn test_forward_path_transitions() {
        assert!(Registered.can_transition_to(Attended));
        assert!(Attended.can_transition_to(Completed));
        // No skipping: completed must be reached through attended.
        assert!(!Registered.can_transition_to(Completed));
    }

    #[test]
    fn test_cancellation_reachability() {
        assert!(Registered.can_transition_to(Cancelled));
        assert!(Attended.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!Completed.can_transition_to(Attended));
        assert!(!Attended.can_transition_to(Registered));
        assert!(!Cancelled.can_transition_to(Registered));
        assert!(!Completed.can_transition_to(Completed));
    }

    #[test]
    fn test_outcome_request_validation() {
        let ok = OutcomeRequest {
            kind: Completed,
            rating: Some(5),
            contribution_hours: Some(2.5),
            feedback: None,
            contribution_description: None,
        };
        assert!(ok.validate().is_ok());

        let bad_rating = OutcomeRequest { rating: Some(6), ..ok.clone() };
        assert!(bad_rating.validate().is_err());

        let negative_hours = OutcomeRequest {
            rating: None,
            contribution_hours: Some(-1.0),
            ..ok
        };
        assert!(negative_hours.validate().is_err());
    }
}
