use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_user_auth, trace_id};
use crate::routes::{actions, health, profile, risk};
use crate::services::risk_summary::RiskClient;
use shared::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub risk: Arc<RiskClient>,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let config = Arc::new(config);

    // Validation-only in production; tests and local setups may also
    // configure the signing half.
    let jwt = match &config.jwt.private_key {
        Some(private_key) => JwtConfig::from_key_pair(
            private_key,
            &config.jwt.public_key,
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        ),
        None => JwtConfig::from_public_key(&config.jwt.public_key, config.jwt.leeway_secs),
    }
    .context("Failed to initialize JWT validation")?;

    let risk = RiskClient::new(&config.climate_risk).context("Failed to build risk client")?;

    let state = AppState {
        pool,
        config: config.clone(),
        jwt: Arc::new(jwt),
        risk: Arc::new(risk),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require a user JWT)
    let protected_routes = Router::new()
        .route("/api/v1/actions", post(actions::create_action))
        .route("/api/v1/actions/:action_id/join", post(actions::join_action))
        .route(
            "/api/v1/actions/:action_id/cancel",
            post(actions::cancel_participation),
        )
        .route(
            "/api/v1/actions/:action_id/outcome",
            post(actions::mark_outcome),
        )
        .route("/api/v1/me/actions", get(profile::my_actions))
        .route("/api/v1/me/activity", get(profile::my_activity))
        .route("/api/v1/me/achievements", get(profile::my_achievements))
        .route("/api/v1/me/stats", get(profile::my_stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/actions", get(actions::list_actions))
        .route("/api/v1/actions/map", get(actions::map_actions))
        .route("/api/v1/actions/:action_id", get(actions::get_action))
        .route(
            "/api/v1/actions/:action_id/participants",
            get(actions::list_participants),
        )
        .route("/api/v1/climate-risk", post(risk::climate_risk));

    // Merge all routes
    let router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state);

    Ok(router)
}
