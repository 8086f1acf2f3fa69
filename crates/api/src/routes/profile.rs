//! Profile endpoints: the caller's actions, activity calendar, achievements
//! and stats.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use domain::models::activity::{fill_calendar, CalendarEntry, DailyActivity};
use domain::models::{Achievement, ClimateAction, ParticipationError, UserStats};
use domain::services::engagement::longest_streak;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::services::EngagementService;

/// Default calendar window, in days, when the caller gives no range.
const DEFAULT_CALENDAR_DAYS: i64 = 365;

/// Longest range a single request may ask for.
const MAX_CALENDAR_DAYS: i64 = 2 * 366;

fn engagement(state: &AppState) -> EngagementService {
    EngagementService::new(state.pool.clone(), state.config.engagement.clone())
}

/// The caller's relationship to the catalog: organized and joined actions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MyActionsResponse {
    pub organized: Vec<ClimateAction>,
    pub joined: Vec<ClimateAction>,
}

/// GET /api/v1/me/actions
pub async fn my_actions(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<MyActionsResponse>, ApiError> {
    let service = engagement(&state);
    let organized = service.actions().list_organized_by(auth.user_id).await?;
    let joined = service.actions().list_participated_by(auth.user_id).await?;

    Ok(Json(MyActionsResponse {
        organized: organized.into_iter().map(Into::into).collect(),
        joined: joined.into_iter().map(Into::into).collect(),
    }))
}

/// Optional range override for the activity calendar.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ActivityQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// GET /api/v1/me/activity
///
/// One entry per day in the requested range (default: the last 365 days),
/// ascending, with inactive days zero-filled.
pub async fn my_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<CalendarEntry>>, ApiError> {
    let to = query.to.unwrap_or_else(|| Utc::now().date_naive());
    let from = query
        .from
        .unwrap_or(to - Duration::days(DEFAULT_CALENDAR_DAYS - 1));

    if from > to {
        return Err(ApiError::Validation("from must not be after to".into()));
    }
    if (to - from).num_days() >= MAX_CALENDAR_DAYS {
        return Err(ApiError::Validation(format!(
            "range must be shorter than {} days",
            MAX_CALENDAR_DAYS
        )));
    }

    let service = engagement(&state);
    let rows: Vec<DailyActivity> = service
        .activities()
        .range(auth.user_id, from, to)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(fill_calendar(from, to, &rows)))
}

/// GET /api/v1/me/achievements
pub async fn my_achievements(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<Vec<Achievement>>, ApiError> {
    let service = engagement(&state);
    let achievements = service.achievements().list(auth.user_id).await?;
    Ok(Json(achievements.into_iter().map(Into::into).collect()))
}

/// Stats response: the stored counters plus the derived streak.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MyStatsResponse {
    #[serde(flatten)]
    pub stats: UserStats,
    pub longest_streak_days: i64,
}

/// GET /api/v1/me/stats
pub async fn my_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<Json<MyStatsResponse>, ApiError> {
    let service = engagement(&state);
    let stats = service
        .users()
        .stats(&state.pool, auth.user_id)
        .await?
        .ok_or(ParticipationError::NotFound)?;
    let dates = service.activities().active_dates(&state.pool, auth.user_id).await?;

    Ok(Json(MyStatsResponse {
        stats: stats.into(),
        longest_streak_days: longest_streak(&dates),
    }))
}
