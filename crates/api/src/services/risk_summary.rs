//! Climate risk summary proxy.
//!
//! Fetches a rendered risk summary for a coordinate from the upstream risk
//! service. Coordinates outside the Baltic service area are rejected before
//! any network traffic happens.

use geo::{coord, Contains, Point, Rect};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ClimateRiskConfig;

/// Baltic sea region service area: (lon, lat) corners.
const SERVICE_AREA_MIN: (f64, f64) = (9.0, 53.0);
const SERVICE_AREA_MAX: (f64, f64) = (32.0, 66.5);

/// Errors from the risk summary proxy.
#[derive(Debug, Error)]
pub enum RiskError {
    #[error("Risk summary service is disabled")]
    Disabled,

    #[error("Coordinate is outside the service area")]
    OutOfServiceArea,

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Risk service unreachable: {0}")]
    Unreachable(String),

    #[error("Invalid response from risk service: {0}")]
    InvalidResponse(String),

    #[error("Risk service error: {0}")]
    Upstream(String),
}

/// A successful risk summary: rendered HTML for the coordinate.
#[derive(Debug, Clone, Serialize)]
pub struct RiskSummary {
    pub html: String,
}

/// Upstream wire format: `{ok: true, html} | {ok: false, error}`.
#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    ok: bool,
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the upstream risk service.
pub struct RiskClient {
    client: Option<Client>,
    url: String,
    timeout_ms: u64,
    enabled: bool,
}

impl RiskClient {
    pub fn new(config: &ClimateRiskConfig) -> Result<Self, reqwest::Error> {
        let client = if config.enabled {
            Some(
                Client::builder()
                    .timeout(Duration::from_millis(config.timeout_ms))
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            client,
            url: config.url.clone(),
            timeout_ms: config.timeout_ms,
            enabled: config.enabled,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the coordinate falls inside the Baltic service area.
    pub fn in_service_area(latitude: f64, longitude: f64) -> bool {
        let area = Rect::new(
            coord! { x: SERVICE_AREA_MIN.0, y: SERVICE_AREA_MIN.1 },
            coord! { x: SERVICE_AREA_MAX.0, y: SERVICE_AREA_MAX.1 },
        );
        area.contains(&Point::new(longitude, latitude))
    }

    /// Fetch the rendered risk summary for a coordinate.
    pub async fn fetch_summary(
        &self,
        latitude: f64,
        longitude: f64,
        location_name: Option<&str>,
    ) -> Result<RiskSummary, RiskError> {
        let client = self.client.as_ref().ok_or(RiskError::Disabled)?;

        if !Self::in_service_area(latitude, longitude) {
            return Err(RiskError::OutOfServiceArea);
        }

        debug!(lat = latitude, lon = longitude, "Fetching risk summary");

        // Upstream wire names: lat/lng/locationName.
        let mut payload = serde_json::json!({ "lat": latitude, "lng": longitude });
        if let Some(name) = location_name {
            payload["locationName"] = serde_json::Value::String(name.to_string());
        }

        let response = client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RiskError::Timeout(self.timeout_ms)
                } else if e.is_connect() {
                    RiskError::Unreachable(e.to_string())
                } else {
                    RiskError::Upstream(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Risk service returned error status");
            return Err(RiskError::Upstream(format!("HTTP {}", status)));
        }

        let body: UpstreamResponse = response
            .json()
            .await
            .map_err(|e| RiskError::InvalidResponse(e.to_string()))?;

        if body.ok {
            match body.html {
                Some(html) => Ok(RiskSummary { html }),
                None => Err(RiskError::InvalidResponse(
                    "ok response without html".to_string(),
                )),
            }
        } else {
            Err(RiskError::Upstream(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

impl From<RiskError> for crate::error::ApiError {
    fn from(err: RiskError) -> Self {
        use crate::error::ApiError;
        match err {
            RiskError::Disabled => {
                ApiError::ServiceUnavailable("Risk summaries are disabled".into())
            }
            RiskError::OutOfServiceArea => {
                ApiError::Validation("Coordinate is outside the service area".into())
            }
            RiskError::Timeout(_) | RiskError::Unreachable(_) => {
                ApiError::ServiceUnavailable("Risk service is unavailable".into())
            }
            RiskError::InvalidResponse(msg) => {
                ApiError::BadGateway(format!("Risk service returned malformed data: {}", msg))
            }
            RiskError::Upstream(msg) => ApiError::BadGateway(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_area_contains_baltic_cities() {
        // Riga, Tallinn, Helsinki, Gdansk
        assert!(RiskClient::in_service_area(56.95, 24.11));
        assert!(RiskClient::in_service_area(59.44, 24.75));
        assert!(RiskClient::in_service_area(60.17, 24.94));
        assert!(RiskClient::in_service_area(54.35, 18.65));
    }

    #[test]
    fn test_service_area_rejects_remote_coordinates() {
        // Lisbon, Reykjavik, equator
        assert!(!RiskClient::in_service_area(38.72, -9.14));
        assert!(!RiskClient::in_service_area(64.15, -21.94));
        assert!(!RiskClient::in_service_area(0.0, 0.0));
    }

    #[test]
    fn test_disabled_client_has_no_http_client() {
        let config = ClimateRiskConfig {
            url: String::new(),
            timeout_ms: 1000,
            enabled: false,
        };
        let client = RiskClient::new(&config).unwrap();
        assert!(!client.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_client_refuses_fetch() {
        let config = ClimateRiskConfig {
            url: String::new(),
            timeout_ms: 1000,
            enabled: false,
        };
        let client = RiskClient::new(&config).unwrap();
        let err = client.fetch_summary(56.95, 24.11, None).await.unwrap_err();
        assert!(matches!(err, RiskError::Disabled));
    }

    #[test]
    fn test_upstream_response_parsing() {
        let ok: UpstreamResponse =
            serde_json::from_str(r#"{"ok": true, "html": "<p>low risk</p>"}"#).unwrap();
        assert!(ok.ok);
        assert_eq!(ok.html.as_deref(), Some("<p>low risk</p>"));

        let err: UpstreamResponse =
            serde_json::from_str(r#"{"ok": false, "error": "no data"}"#).unwrap();
        assert!(!err.ok);
        assert_eq!(err.error.as_deref(), Some("no data"));
    }
}
