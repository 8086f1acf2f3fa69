//! Engagement service: the transactional core of participation.
//!
//! Every mutating operation here runs as one database transaction. Joins
//! serialise per action on a row lock so the capacity check and the insert
//! behave as a unit; the partial unique index backs that up against races.
//! Derived state (daily activity, counters, achievements) is updated inside
//! the same transaction, so a commit is all-or-nothing.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use domain::models::action::CreateActionRequest;
use domain::models::participation::OutcomeRequest;
use domain::models::{ClimateAction, Participation, ParticipationError, ParticipationKind};
use domain::services::engagement::{ensure_can_join, longest_streak, EngagementStats};
use domain::services::EngagementPolicy;
use persistence::repositories::{
    AchievementRepository, ActionRepository, ActivityRepository, ParticipationRepository,
    UserRepository,
};

use crate::error::ApiError;
use crate::middleware::metrics::{
    record_achievement_granted, record_action_created, record_participation_cancelled,
    record_participation_joined,
};

/// Orchestrates joins, cancellations, outcomes and the derived stats that
/// follow from them.
#[derive(Clone)]
pub struct EngagementService {
    pool: PgPool,
    policy: EngagementPolicy,
    actions: ActionRepository,
    participations: ParticipationRepository,
    activities: ActivityRepository,
    achievements: AchievementRepository,
    users: UserRepository,
}

impl EngagementService {
    pub fn new(pool: PgPool, policy: EngagementPolicy) -> Self {
        Self {
            actions: ActionRepository::new(pool.clone()),
            participations: ParticipationRepository::new(pool.clone()),
            activities: ActivityRepository::new(pool.clone()),
            achievements: AchievementRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            pool,
            policy,
        }
    }

    pub fn actions(&self) -> &ActionRepository {
        &self.actions
    }

    pub fn participations(&self) -> &ParticipationRepository {
        &self.participations
    }

    pub fn activities(&self) -> &ActivityRepository {
        &self.activities
    }

    pub fn achievements(&self) -> &AchievementRepository {
        &self.achievements
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn policy(&self) -> &EngagementPolicy {
        &self.policy
    }

    /// Create an action with the caller as organizer. Bumps the organized
    /// counter and re-evaluates achievements in the same transaction.
    pub async fn create_action(
        &self,
        organizer_id: Uuid,
        request: &CreateActionRequest,
    ) -> Result<ClimateAction, ApiError> {
        let mut tx = self.pool.begin().await?;

        let entity = self.actions.create(&mut tx, organizer_id, request).await?;
        self.users
            .increment_actions_organized(&mut tx, organizer_id)
            .await?;

        let today = Utc::now().date_naive();
        let day_count = self
            .activities
            .increment(&mut tx, organizer_id, today, 1)
            .await?;
        let level = self.policy.contribution_level(day_count);
        self.activities
            .set_level(&mut tx, organizer_id, today, level)
            .await?;

        self.evaluate_achievements(&mut tx, organizer_id).await?;
        tx.commit().await?;

        let action: ClimateAction = entity.into();
        record_action_created(action.action_type.as_str());
        info!(action_id = %action.id, organizer_id = %organizer_id, "Action created");
        Ok(action)
    }

    /// Join an action.
    ///
    /// Gate order: existing registration, then registration deadline, then
    /// capacity. The action row is locked first so concurrent joins for the
    /// same action queue up behind each other.
    pub async fn join_action(
        &self,
        action_id: Uuid,
        user_id: Uuid,
    ) -> Result<Participation, ApiError> {
        let mut tx = self.pool.begin().await?;

        let action: ClimateAction = self
            .actions
            .lock_for_registration(&mut tx, action_id)
            .await?
            .ok_or(ParticipationError::NotFound)?
            .into();

        let already_joined = self
            .participations
            .find_active(&mut *tx, action_id, user_id)
            .await?
            .is_some();
        let active = self
            .actions
            .active_participant_count(&mut *tx, action_id)
            .await?;

        ensure_can_join(&action, active, already_joined, Utc::now())?;

        let participation = match self
            .participations
            .insert_registered(&mut tx, action_id, user_id)
            .await
        {
            Ok(p) => p,
            Err(e) if is_unique_violation(&e) => {
                return Err(ParticipationError::AlreadyJoined.into());
            }
            Err(e) => return Err(e.into()),
        };

        self.users.increment_actions_joined(&mut tx, user_id).await?;

        let today = Utc::now().date_naive();
        let day_count = self.activities.increment(&mut tx, user_id, today, 1).await?;
        let level = self.policy.contribution_level(day_count);
        self.activities
            .set_level(&mut tx, user_id, today, level)
            .await?;

        self.evaluate_achievements(&mut tx, user_id).await?;
        tx.commit().await?;

        record_participation_joined(action.action_type.as_str());
        info!(action_id = %action_id, user_id = %user_id, "Joined action");
        Ok(participation.into())
    }

    /// Cancel the caller's registration. The day's activity record stays as
    /// it was; cancellation is not an activity event.
    pub async fn cancel_participation(
        &self,
        action_id: Uuid,
        user_id: Uuid,
    ) -> Result<Participation, ApiError> {
        let mut tx = self.pool.begin().await?;

        let participation = self
            .participations
            .find_active(&mut *tx, action_id, user_id)
            .await?
            .ok_or(ParticipationError::NotFound)?;

        let from: ParticipationKind = participation.kind.into();
        if !from.can_transition_to(ParticipationKind::Cancelled) {
            return Err(ParticipationError::InvalidTransition {
                from,
                to: ParticipationKind::Cancelled,
            }
            .into());
        }

        self.participations.cancel(&mut tx, participation.id).await?;
        tx.commit().await?;

        record_participation_cancelled();
        info!(action_id = %action_id, user_id = %user_id, "Cancelled participation");

        let mut cancelled: Participation = participation.into();
        cancelled.kind = ParticipationKind::Cancelled;
        Ok(cancelled)
    }

    /// Record a post-event outcome for the caller's participation.
    ///
    /// Moving to completed converts logged contribution hours into impact
    /// points and re-evaluates achievements.
    pub async fn mark_outcome(
        &self,
        action_id: Uuid,
        user_id: Uuid,
        request: &OutcomeRequest,
    ) -> Result<Participation, ApiError> {
        let mut tx = self.pool.begin().await?;

        let participation = self
            .participations
            .find_active(&mut *tx, action_id, user_id)
            .await?
            .ok_or(ParticipationError::NotFound)?;

        let from: ParticipationKind = participation.kind.into();
        if !from.can_transition_to(request.kind) {
            return Err(ParticipationError::InvalidTransition {
                from,
                to: request.kind,
            }
            .into());
        }

        let updated = self
            .participations
            .record_outcome(
                &mut tx,
                participation.id,
                request.kind.into(),
                request.rating,
                request.contribution_hours,
                request.feedback.as_deref(),
                request.contribution_description.as_deref(),
            )
            .await?;

        if request.kind == ParticipationKind::Completed {
            let points = self.policy.impact_points(updated.contribution_hours);
            if points > 0 {
                self.users.add_impact_score(&mut tx, user_id, points).await?;
                debug!(user_id = %user_id, points = points, "Impact points added");
            }
            self.evaluate_achievements(&mut tx, user_id).await?;
        }

        tx.commit().await?;
        info!(
            action_id = %action_id,
            user_id = %user_id,
            kind = request.kind.as_str(),
            "Outcome recorded"
        );
        Ok(updated.into())
    }

    /// Grant every achievement whose threshold the user's current stats
    /// cross. Idempotent: already-held achievements are skipped by the store.
    async fn evaluate_achievements(
        &self,
        tx: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<(), ApiError> {
        let stats = self
            .users
            .stats(&mut *tx, user_id)
            .await?
            .ok_or(ParticipationError::NotFound)?;
        let citizen_science = self
            .participations
            .citizen_science_count(&mut *tx, user_id)
            .await?;
        let dates = self.activities.active_dates(&mut *tx, user_id).await?;

        let snapshot = EngagementStats {
            actions_joined: stats.actions_joined,
            actions_organized: stats.actions_organized,
            impact_score: stats.impact_score,
            citizen_science_participations: citizen_science,
            longest_streak_days: longest_streak(&dates),
        };

        for achievement in self.policy.due_achievements(&snapshot) {
            let granted = self
                .achievements
                .grant_if_absent(
                    tx,
                    user_id,
                    achievement.into(),
                    achievement.name(),
                    achievement.description(),
                    achievement.icon(),
                )
                .await?;
            if granted {
                record_achievement_granted(achievement.name());
                info!(user_id = %user_id, achievement = achievement.name(), "Achievement granted");
            }
        }

        Ok(())
    }
}

/// Whether the error is a unique-constraint violation (Postgres 23505).
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}
