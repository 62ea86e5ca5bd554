use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
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
    metrics_handler, metrics_middleware, rate_limit_middleware, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    auth, campaigns, characters, downtime, health, invites, join, npcs, quests, sessions,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Create rate limiter if rate limiting is enabled (rate_limit_per_minute > 0)
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

    // Protected routes (require a user JWT)
    // Middleware order: auth runs first, then rate limiting (keyed by user id)
    let protected_routes = Router::new()
        // Party join (the invite preview below stays public)
        .route("/api/v1/join", post(join::join_campaign))
        // Character routes
        .route(
            "/api/v1/characters",
            post(characters::create_character).get(characters::list_characters),
        )
        .route(
            "/api/v1/characters/:character_id",
            get(characters::get_character)
                .put(characters::update_character)
                .delete(characters::delete_character),
        )
        .route(
            "/api/v1/characters/:character_id/state",
            patch(characters::update_character_state),
        )
        .route(
            "/api/v1/characters/:character_id/downtime",
            post(downtime::create_downtime).get(downtime::list_downtime),
        )
        .route(
            "/api/v1/characters/:character_id/passport/mint",
            post(characters::mint_passport),
        )
        // Campaign routes
        .route(
            "/api/v1/campaigns",
            post(campaigns::create_campaign).get(campaigns::list_campaigns),
        )
        .route(
            "/api/v1/campaigns/:campaign_id",
            get(campaigns::get_campaign)
                .put(campaigns::update_campaign)
                .delete(campaigns::archive_campaign),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/party",
            get(campaigns::list_party),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/party/:member_id",
            delete(campaigns::remove_party_member),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/badge/mint",
            post(campaigns::mint_badge),
        )
        // Invite management
        .route(
            "/api/v1/campaigns/:campaign_id/invites",
            post(invites::create_invite).get(invites::list_invites),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/invites/:invite_id",
            delete(invites::revoke_invite),
        )
        // Session logs
        .route(
            "/api/v1/campaigns/:campaign_id/sessions",
            post(sessions::create_session).get(sessions::list_sessions),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/sessions/:session_id",
            put(sessions::update_session).delete(sessions::delete_session),
        )
        // Quests
        .route(
            "/api/v1/campaigns/:campaign_id/quests",
            post(quests::create_quest).get(quests::list_quests),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/quests/:quest_id",
            put(quests::update_quest).delete(quests::delete_quest),
        )
        // NPCs
        .route(
            "/api/v1/campaigns/:campaign_id/npcs",
            post(npcs::create_npc).get(npcs::list_npcs),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/npcs/:npc_id",
            put(npcs::update_npc).delete(npcs::delete_npc),
        )
        // Rate limiting runs after auth (needs the user id from auth)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        // Auth runs first (outermost layer = runs first)
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
        // Auth endpoints
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        // Invite preview: public, but tailored when a Bearer token is present
        .route("/api/v1/join/:token", get(join::preview_invite));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
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
