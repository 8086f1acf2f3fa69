//! Climate action endpoints: catalog, map view and participation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use domain::models::action::{
    ActionWithParticipants, CreateActionRequest, ListActionsQuery, MapActionEntry,
};
use domain::models::participation::OutcomeRequest;
use domain::models::{ClimateAction, Participation, ParticipationError};
use persistence::entities::ActionWithCountEntity;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::services::EngagementService;

fn engagement(state: &AppState) -> EngagementService {
    EngagementService::new(state.pool.clone(), state.config.engagement.clone())
}

fn with_participants(entity: ActionWithCountEntity) -> ActionWithParticipants {
    ActionWithParticipants {
        action: entity.action.into(),
        participant_count: entity.participant_count,
    }
}

/// GET /api/v1/actions
///
/// Lists actions with optional type/status/location/upcoming filters.
pub async fn list_actions(
    State(state): State<AppState>,
    Query(query): Query<ListActionsQuery>,
) -> Result<Json<Vec<ActionWithParticipants>>, ApiError> {
    let service = engagement(&state);
    let actions = service.actions().list(&query).await?;
    Ok(Json(actions.into_iter().map(with_participants).collect()))
}

/// GET /api/v1/actions/map
///
/// Upcoming and ongoing actions in the compact shape the map view wants.
pub async fn map_actions(
    State(state): State<AppState>,
) -> Result<Json<Vec<MapActionEntry>>, ApiError> {
    let service = engagement(&state);
    let actions = service.actions().map_actions().await?;

    let entries = actions
        .into_iter()
        .map(|entity| {
            let action: ClimateAction = entity.action.into();
            MapActionEntry {
                id: action.id,
                title: action.title,
                action_type: action.action_type,
                type_display: action.action_type.label(),
                latitude: action.latitude,
                longitude: action.longitude,
                start_time: action.start_time,
                end_time: action.end_time,
                location_name: action.location_name,
                participant_count: entity.participant_count,
                max_participants: action.max_participants,
            }
        })
        .collect();

    Ok(Json(entries))
}

/// GET /api/v1/actions/:action_id
pub async fn get_action(
    State(state): State<AppState>,
    Path(action_id): Path<Uuid>,
) -> Result<Json<ActionWithParticipants>, ApiError> {
    let service = engagement(&state);
    let entity = service
        .actions()
        .find_with_count(action_id)
        .await?
        .ok_or(ParticipationError::NotFound)?;
    Ok(Json(with_participants(entity)))
}

/// GET /api/v1/actions/:action_id/participants
///
/// Non-cancelled participations, oldest registration first.
pub async fn list_participants(
    State(state): State<AppState>,
    Path(action_id): Path<Uuid>,
) -> Result<Json<Vec<Participation>>, ApiError> {
    let service = engagement(&state);
    service
        .actions()
        .find_by_id(action_id)
        .await?
        .ok_or(ParticipationError::NotFound)?;

    let participants = service.participations().list_for_action(action_id).await?;
    Ok(Json(participants.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/actions
///
/// Creates an action with the caller as organizer.
pub async fn create_action(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<CreateActionRequest>,
) -> Result<(StatusCode, Json<ClimateAction>), ApiError> {
    request.validate()?;
    if request.end_time <= request.start_time {
        return Err(ApiError::Validation(
            "end_time must be after start_time".into(),
        ));
    }

    let service = engagement(&state);
    let action = service.create_action(auth.user_id, &request).await?;
    Ok((StatusCode::CREATED, Json(action)))
}

/// POST /api/v1/actions/:action_id/join
pub async fn join_action(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(action_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Participation>), ApiError> {
    let service = engagement(&state);
    let participation = service.join_action(action_id, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(participation)))
}

/// POST /api/v1/actions/:action_id/cancel
pub async fn cancel_participation(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(action_id): Path<Uuid>,
) -> Result<Json<Participation>, ApiError> {
    let service = engagement(&state);
    let participation = service.cancel_participation(action_id, auth.user_id).await?;
    Ok(Json(participation))
}

/// POST /api/v1/actions/:action_id/outcome
pub async fn mark_outcome(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(action_id): Path<Uuid>,
    Json(request): Json<OutcomeRequest>,
) -> Result<Json<Participation>, ApiError> {
    request.validate()?;

    let service = engagement(&state);
    let participation = service
        .mark_outcome(action_id, auth.user_id, &request)
        .await?;
    Ok(Json(participation))
}
