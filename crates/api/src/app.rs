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
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_profile_auth,
    require_service_auth, security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    approvals, health, instances, internal, leaderboard, notifications, time_check,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Rate limiting is disabled entirely when the limit is zero
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
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

    // Profile routes (require a profile JWT)
    // Middleware order: auth runs first, then rate limiting (keyed by profile)
    let profile_routes = Router::new()
        // Instance lifecycle (v1)
        .route("/api/v1/instances", get(instances::list_instances))
        .route(
            "/api/v1/instances/:instance_id/claim",
            post(instances::claim_instance),
        )
        .route(
            "/api/v1/instances/:instance_id/submit",
            post(instances::submit_instance),
        )
        .route(
            "/api/v1/instances/:instance_id/time-check",
            post(time_check::time_check),
        )
        // Approval workflow (v1)
        .route(
            "/api/v1/instances/:instance_id/approval",
            post(approvals::decide_instance),
        )
        .route(
            "/api/v1/approvals/pending",
            get(approvals::list_pending_approvals),
        )
        // Leaderboard (v1)
        .route("/api/v1/leaderboard", get(leaderboard::get_leaderboard))
        // Notifications (v1)
        .route(
            "/api/v1/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/api/v1/notifications/:notification_id/read",
            post(notifications::mark_notification_read),
        )
        .route(
            "/api/v1/notifications/read-all",
            post(notifications::mark_all_notifications_read),
        )
        // Rate limiting runs after auth (needs the profile from auth)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_profile_auth,
        ));

    // Internal routes (cron secret or service key)
    let internal_routes = Router::new()
        .route(
            "/api/v1/internal/spawn-recurring",
            post(internal::spawn_recurring),
        )
        .route(
            "/api/v1/internal/refresh-leaderboard",
            post(internal::refresh_leaderboard),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_service_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(profile_routes)
        .merge(internal_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware)) // Security headers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
