//! Climate risk summary proxy endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::app::AppState;
use crate::services::RiskError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RiskRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: Option<String>,
}

/// POST /api/v1/climate-risk
///
/// Proxies the upstream risk service, preserving its
/// `{ok: true, html} | {ok: false, error}` contract.
pub async fn climate_risk(
    State(state): State<AppState>,
    Json(request): Json<RiskRequest>,
) -> Response {
    match state
        .risk
        .fetch_summary(
            request.latitude,
            request.longitude,
            request.location_name.as_deref(),
        )
        .await
    {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({ "ok": true, "html": summary.html })),
        )
            .into_response(),
        Err(err) => {
            let status = match &err {
                RiskError::OutOfServiceArea => StatusCode::BAD_REQUEST,
                RiskError::Disabled | RiskError::Timeout(_) | RiskError::Unreachable(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                RiskError::InvalidResponse(_) | RiskError::Upstream(_) => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(json!({ "ok": false, "error": err.to_string() })),
            )
                .into_response()
        }
    }
}
