//! Achievement domain models.
//!
//! Achievements are one-time, irrevocable badges. A (user, type) pair is
//! granted at most once, ever; `date_earned` is fixed at grant time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed set of achievement types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementType {
    ClimateChampion,
    CommunityBuilder,
    CitizenScientist,
    Organizer,
    Mentor,
    Advocate,
}

impl AchievementType {
    /// Every type, in a fixed evaluation order.
    pub const ALL: [AchievementType; 6] = [
        Self::ClimateChampion,
        Self::CommunityBuilder,
        Self::CitizenScientist,
        Self::Organizer,
        Self::Mentor,
        Self::Advocate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ClimateChampion => "Climate Champion",
            Self::CommunityBuilder => "Community Builder",
            Self::CitizenScientist => "Citizen Scientist",
            Self::Organizer => "Event Organizer",
            Self::Mentor => "Mentor",
            Self::Advocate => "Climate Advocate",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ClimateChampion => "Earned a substantial cumulative impact score",
            Self::CommunityBuilder => "Organized multiple climate actions",
            Self::CitizenScientist => "Took part in several citizen science actions",
            Self::Organizer => "Organized a first climate action",
            Self::Mentor => "Kept a long unbroken streak of daily activity",
            Self::Advocate => "Joined many climate actions",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::ClimateChampion => "🏆",
            Self::CommunityBuilder => "🤝",
            Self::CitizenScientist => "🔬",
            Self::Organizer => "📣",
            Self::Mentor => "🌱",
            Self::Advocate => "🌍",
        }
    }
}

/// A granted achievement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Achievement {
    pub user_id: Uuid,
    pub achievement_type: AchievementType,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub date_earned: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_type() {
        assert_eq!(AchievementType::ALL.len(), 6);
        let unique: std::collections::HashSet<_> = AchievementType::ALL.iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&AchievementType::ClimateChampion).unwrap();
        assert_eq!(json, "\"climate_champion\"");
        let back: AchievementType = serde_json::from_str("\"citizen_scientist\"").unwrap();
        assert_eq!(back, AchievementType::CitizenScientist);
    }
}
