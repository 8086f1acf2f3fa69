//! Engagement policy: the join gate, contribution-level buckets, impact
//! scoring and achievement thresholds.
//!
//! Every threshold lives in [`EngagementPolicy`] so tests (and deployment
//! config) can override them; nothing here touches storage.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::models::action::ClimateAction;
use crate::models::achievement::AchievementType;
use crate::models::participation::ParticipationError;

/// Contribution-level breakpoints: the minimum daily action count for levels
/// 1 through 4. With the defaults `[1, 2, 4, 7]` the buckets are
/// 0→0, 1→1, 2-3→2, 4-6→3, 7+→4.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ContributionLevels {
    pub breakpoints: [i32; 4],
}

impl Default for ContributionLevels {
    fn default() -> Self {
        Self { breakpoints: [1, 2, 4, 7] }
    }
}

impl ContributionLevels {
    pub fn level_for(&self, action_count: i32) -> i16 {
        let mut level = 0i16;
        for (i, min) in self.breakpoints.iter().enumerate() {
            if action_count >= *min {
                level = (i + 1) as i16;
            }
        }
        level
    }
}

/// Minimum cumulative stats required for each achievement.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AchievementThresholds {
    /// climate_champion: cumulative impact score.
    pub champion_impact_score: i64,
    /// community_builder: actions organized.
    pub builder_actions_organized: i64,
    /// citizen_scientist: participations in citizen_science actions.
    pub scientist_participations: i64,
    /// organizer: actions organized.
    pub organizer_actions_organized: i64,
    /// mentor: longest daily-activity streak, in days.
    pub mentor_streak_days: i64,
    /// advocate: actions joined.
    pub advocate_actions_joined: i64,
}

impl Default for AchievementThresholds {
    fn default() -> Self {
        Self {
            champion_impact_score: 100,
            builder_actions_organized: 5,
            scientist_participations: 3,
            organizer_actions_organized: 1,
            mentor_streak_days: 30,
            advocate_actions_joined: 10,
        }
    }
}

/// The full engagement policy handed to the aggregation and achievement
/// components at construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngagementPolicy {
    pub levels: ContributionLevels,
    pub thresholds: AchievementThresholds,
    /// Impact points granted per logged contribution hour.
    pub impact_points_per_hour: f64,
}

impl Default for EngagementPolicy {
    fn default() -> Self {
        Self {
            levels: ContributionLevels::default(),
            thresholds: AchievementThresholds::default(),
            impact_points_per_hour: DEFAULT_IMPACT_POINTS_PER_HOUR,
        }
    }
}

impl EngagementPolicy {
    pub fn contribution_level(&self, action_count: i32) -> i16 {
        self.levels.level_for(action_count)
    }

    /// Impact points for a completed participation's logged hours.
    pub fn impact_points(&self, contribution_hours: f64) -> i64 {
        (contribution_hours * self.impact_points_per_hour).round() as i64
    }

    /// Achievement types whose threshold `stats` crosses. The store decides
    /// which of these are new; evaluation itself is order-independent and
    /// idempotent.
    pub fn due_achievements(&self, stats: &EngagementStats) -> Vec<AchievementType> {
        let t = &self.thresholds;
        AchievementType::ALL
            .into_iter()
            .filter(|a| match a {
                AchievementType::ClimateChampion => stats.impact_score >= t.champion_impact_score,
                AchievementType::CommunityBuilder => {
                    stats.actions_organized >= t.builder_actions_organized
                }
                AchievementType::CitizenScientist => {
                    stats.citizen_science_participations >= t.scientist_participations
                }
                AchievementType::Organizer => {
                    stats.actions_organized >= t.organizer_actions_organized
                }
                AchievementType::Mentor => stats.longest_streak_days >= t.mentor_streak_days,
                AchievementType::Advocate => stats.actions_joined >= t.advocate_actions_joined,
            })
            .collect()
    }
}

/// Default weight for `impactScore += round(hours * weight)`.
pub const DEFAULT_IMPACT_POINTS_PER_HOUR: f64 = 10.0;

/// Cumulative stats snapshot fed to achievement evaluation.
#[derive(Debug, Clone, Default)]
pub struct EngagementStats {
    pub actions_joined: i64,
    pub actions_organized: i64,
    pub impact_score: i64,
    pub citizen_science_participations: i64,
    pub longest_streak_days: i64,
}

/// Length of the longest run of consecutive days.
///
/// `dates` must be ascending and duplicate-free (the activity store's
/// natural order).
pub fn longest_streak(dates: &[NaiveDate]) -> i64 {
    let mut longest = 0i64;
    let mut current = 0i64;
    let mut prev: Option<NaiveDate> = None;

    for &date in dates {
        current = match prev {
            Some(p) if p.succ_opt() == Some(date) => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        prev = Some(date);
    }

    longest
}

/// The join gate. Validates a join attempt against an action snapshot, the
/// active participant count and the caller's existing registration.
///
/// Check order is fixed and load-bearing: an existing registration wins over
/// everything, a passed deadline is reported before a full house.
pub fn ensure_can_join(
    action: &ClimateAction,
    active_participants: i64,
    already_joined: bool,
    now: DateTime<Utc>,
) -> Result<(), ParticipationError> {
    if already_joined {
        return Err(ParticipationError::AlreadyJoined);
    }

    if !action.registration_open(now) {
        return Err(ParticipationError::RegistrationClosed);
    }

    if let Some(cap) = action.max_participants {
        if active_participants >= cap as i64 {
            return Err(ParticipationError::Full);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::action::{ActionStatus, ActionType};
    use chrono::Duration;
    use uuid::Uuid;

    fn action_with(max: Option<i32>, deadline: Option<DateTime<Utc>>) -> ClimateAction {
        let now = Utc::now();
        ClimateAction {
            id: Uuid::new_v4(),
            title: "Coastal survey".to_string(),
            description: "Mapping erosion markers".to_string(),
            action_type: ActionType::CitizenScience,
            status: ActionStatus::Upcoming,
            location_name: "Saaremaa".to_string(),
            latitude: 58.4,
            longitude: 22.5,
            country: "Estonia".to_string(),
            city: "Kuressaare".to_string(),
            start_time: now + Duration::days(1),
            end_time: now + Duration::days(1) + Duration::hours(3),
            organizer_id: Uuid::new_v4(),
            organization_name: None,
            max_participants: max,
            registration_deadline: deadline,
            tags: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_level_buckets_match_breakpoints() {
        let levels = ContributionLevels::default();
        assert_eq!(levels.level_for(0), 0);
        assert_eq!(levels.level_for(1), 1);
        assert_eq!(levels.level_for(2), 2);
        assert_eq!(levels.level_for(3), 2);
        assert_eq!(levels.level_for(4), 3);
        assert_eq!(levels.level_for(6), 3);
        assert_eq!(levels.level_for(7), 4);
        assert_eq!(levels.level_for(40), 4);
    }

    #[test]
    fn test_level_breakpoints_overridable() {
        let levels = ContributionLevels { breakpoints: [2, 4, 8, 16] };
        assert_eq!(levels.level_for(1), 0);
        assert_eq!(levels.level_for(2), 1);
        assert_eq!(levels.level_for(16), 4);
    }

    #[test]
    fn test_impact_points_rounding() {
        let policy = EngagementPolicy::default();
        assert_eq!(policy.impact_points(2.0), 20);
        assert_eq!(policy.impact_points(1.54), 15);
        assert_eq!(policy.impact_points(1.55), 16);
        assert_eq!(policy.impact_points(0.0), 0);
    }

    #[test]
    fn test_due_achievements_thresholds() {
        let policy = EngagementPolicy::default();

        let nobody = EngagementStats::default();
        assert!(policy.due_achievements(&nobody).is_empty());

        let first_organizer = EngagementStats { actions_organized: 1, ..Default::default() };
        assert_eq!(
            policy.due_achievements(&first_organizer),
            vec![AchievementType::Organizer]
        );

        let veteran = EngagementStats {
            actions_joined: 10,
            actions_organized: 5,
            impact_score: 150,
            citizen_science_participations: 3,
            longest_streak_days: 31,
        };
        assert_eq!(policy.due_achievements(&veteran).len(), 6);
    }

    #[test]
    fn test_longest_streak() {
        let d = |s: &str| s.parse::<NaiveDate>().unwrap();
        assert_eq!(longest_streak(&[]), 0);
        assert_eq!(longest_streak(&[d("2025-01-01")]), 1);
        assert_eq!(
            longest_streak(&[d("2025-01-01"), d("2025-01-02"), d("2025-01-04"), d("2025-01-05"), d("2025-01-06")]),
            3
        );
    }

    #[test]
    fn test_join_gate_success() {
        let action = action_with(Some(10), None);
        assert!(ensure_can_join(&action, 9, false, Utc::now()).is_ok());
    }

    #[test]
    fn test_join_gate_full() {
        let action = action_with(Some(10), None);
        let err = ensure_can_join(&action, 10, false, Utc::now()).unwrap_err();
        assert!(matches!(err, ParticipationError::Full));
    }

    #[test]
    fn test_join_gate_unlimited_capacity() {
        let action = action_with(None, None);
        assert!(ensure_can_join(&action, 100_000, false, Utc::now()).is_ok());
    }

    #[test]
    fn test_join_gate_already_joined_wins() {
        let now = Utc::now();
        let action = action_with(Some(1), Some(now - Duration::seconds(1)));
        let err = ensure_can_join(&action, 1, true, now).unwrap_err();
        assert!(matches!(err, ParticipationError::AlreadyJoined));
    }

    #[test]
    fn test_join_gate_deadline_precedes_capacity() {
        // Capacity available, deadline one second in the past: the caller
        // must see RegistrationClosed, not Full.
        let now = Utc::now();
        let action = action_with(Some(1), Some(now - Duration::seconds(1)));
        let err = ensure_can_join(&action, 0, false, now).unwrap_err();
        assert!(matches!(err, ParticipationError::RegistrationClosed));
    }
}
