//! Climate action domain models.
//!
//! A climate action is a capacity- and time-bounded event users can join.
//! Whether an action is upcoming/ongoing/past is always derived from a
//! snapshot plus an explicit `now`, never from a live database row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Category of a climate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
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

impl ActionType {
    /// Human-readable label for map popups and listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CitizenScience => "Citizen Science",
            Self::ClimateAssembly => "Local Climate Assembly",
            Self::LifestyleChange => "Lifestyle Changes",
            Self::Workshop => "Workshop/Event",
            Self::NgoInitiative => "NGO & Community Initiative",
            Self::ResourceSharing => "Resource Sharing",
            Self::ParticipatoryBudgeting => "Participatory Budgeting",
            Self::Hackathon => "Hackathon",
            Self::Protest => "Climate Protest",
            Self::Seminar => "Educational Seminar",
        }
    }

    /// The wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CitizenScience => "citizen_science",
            Self::ClimateAssembly => "climate_assembly",
            Self::LifestyleChange => "lifestyle_change",
            Self::Workshop => "workshop",
            Self::NgoInitiative => "ngo_initiative",
            Self::ResourceSharing => "resource_sharing",
            Self::ParticipatoryBudgeting => "participatory_budgeting",
            Self::Hackathon => "hackathon",
            Self::Protest => "protest",
            Self::Seminar => "seminar",
        }
    }
}

/// Lifecycle status of a climate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

/// An immutable snapshot of a climate action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClimateAction {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub action_type: ActionType,
    pub status: ActionStatus,

    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub city: String,

    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    pub organizer_id: Uuid,
    pub organization_name: Option<String>,

    /// None means unlimited capacity.
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,

    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClimateAction {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }

    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    pub fn is_completed(&self, now: DateTime<Utc>) -> bool {
        self.end_time < now
    }

    /// Whether the registration window is still open at `now`.
    /// An absent deadline never closes registration.
    pub fn registration_open(&self, now: DateTime<Utc>) -> bool {
        match self.registration_deadline {
            Some(deadline) => now <= deadline,
            None => true,
        }
    }
}

lazy_static::lazy_static! {
    /// Comma-separated lowercase tags, e.g. "coastal,flooding,volunteering".
    static ref TAGS_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9_-]+(,[a-z0-9_-]+)*$").unwrap();
}

/// Request to create a new climate action.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateActionRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,

    pub action_type: ActionType,

    #[validate(length(min = 1, max = 200, message = "location_name must be 1-200 characters"))]
    pub location_name: String,

    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    pub longitude: f64,

    #[validate(length(min = 1, max = 50))]
    pub country: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    #[validate(length(max = 200))]
    pub organization_name: Option<String>,

    #[validate(range(min = 1, message = "max_participants must be positive"))]
    pub max_participants: Option<i32>,

    pub registration_deadline: Option<DateTime<Utc>>,

    #[validate(regex(
        path = *TAGS_REGEX,
        message = "tags must be comma-separated lowercase tokens"
    ))]
    pub tags: Option<String>,
}

/// Query filters for listing actions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListActionsQuery {
    #[serde(rename = "type")]
    pub action_type: Option<ActionType>,
    pub status: Option<ActionStatus>,
    /// Substring match against city or country.
    pub location: Option<String>,
    /// When true, only actions that have not started yet.
    #[serde(default)]
    pub upcoming: bool,
}

/// Action with its derived participant count, as returned by detail and
/// listing endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ActionWithParticipants {
    #[serde(flatten)]
    pub action: ClimateAction,
    pub participant_count: i64,
}

/// Compact shape for the map view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MapActionEntry {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub type_display: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location_name: String,
    pub participant_count: i64,
    pub max_participants: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_action(start_offset_h: i64, end_offset_h: i64) -> ClimateAction {
        let now = Utc::now();
        ClimateAction {
            id: Uuid::new_v4(),
            title: "Beach cleanup".to_string(),
            description: "Cleaning the Pirita beach".to_string(),
            action_type: ActionType::NgoInitiative,
            status: ActionStatus::Upcoming,
            location_name: "Pirita beach".to_string(),
            latitude: 59.47,
            longitude: 24.83,
            country: "Estonia".to_string(),
            city: "Tallinn".to_string(),
            start_time: now + Duration::hours(start_offset_h),
            end_time: now + Duration::hours(end_offset_h),
            organizer_id: Uuid::new_v4(),
            organization_name: None,
            max_participants: Some(30),
            registration_deadline: None,
            tags: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_snapshot_predicates() {
        let now = Utc::now();

        let upcoming = sample_action(2, 4);
        assert!(upcoming.is_upcoming(now));
        assert!(!upcoming.is_ongoing(now));
        assert!(!upcoming.is_completed(now));

        let ongoing = sample_action(-1, 1);
        assert!(!ongoing.is_upcoming(now));
        assert!(ongoing.is_ongoing(now));
        assert!(!ongoing.is_completed(now));

        let past = sample_action(-4, -2);
        assert!(past.is_completed(now));
    }

    #[test]
    fn test_registration_open_without_deadline() {
        let action = sample_action(2, 4);
        assert!(action.registration_open(Utc::now()));
    }

    #[test]
    fn test_registration_closes_after_deadline() {
        let now = Utc::now();
        let mut action = sample_action(2, 4);
        action.registration_deadline = Some(now - Duration::seconds(1));
        assert!(!action.registration_open(now));

        action.registration_deadline = Some(now + Duration::minutes(5));
        assert!(action.registration_open(now));
    }

    #[test]
    fn test_create_request_validation() {
        let valid = CreateActionRequest {
            title: "Bog restoration day".to_string(),
            description: "Hands-on restoration work".to_string(),
            action_type: ActionType::CitizenScience,
            location_name: "Viru bog".to_string(),
            latitude: 59.47,
            longitude: 24.66,
            country: "Estonia".to_string(),
            city: "Harjumaa".to_string(),
            start_time: Utc::now(),
            end_time: Utc::now(),
            organization_name: None,
            max_participants: Some(20),
            registration_deadline: None,
            tags: Some("wetlands,volunteering".to_string()),
        };
        assert!(valid.validate().is_ok());

        let mut bad_lat = valid.clone();
        bad_lat.latitude = 123.0;
        assert!(bad_lat.validate().is_err());

        let mut zero_capacity = valid.clone();
        zero_capacity.max_participants = Some(0);
        assert!(zero_capacity.validate().is_err());

        let mut bad_tags = valid;
        bad_tags.tags = Some("Has Spaces, And Caps".to_string());
        assert!(bad_tags.validate().is_err());
    }

    #[test]
    fn test_action_type_serde_names() {
        let json = serde_json::to_string(&ActionType::CitizenScience).unwrap();
        assert_eq!(json, "\"citizen_science\"");
        assert_eq!(ActionType::Protest.label(), "Climate Protest");
    }
}
