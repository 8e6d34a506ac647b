//! PairAgent Server
//!
//! ```text
//! /api/agents/pricing   POST  ChargePricer      ($0.002, x402 gated)
//! /api/agents/routing   POST  PathFinder        ($0.005, x402 gated)
//! /api/agents/weather   POST  AtmoSense         ($0.001, x402 gated)
//! /api/agents/slot      POST  SlotNegotiator    ($0.003, x402 gated)
//! /api/orchestrate      POST  plan for a device state
//! /api/registry         GET   agent catalog + device profile
//! /api/registry/:id     GET   one agent
//! /health               GET   liveness
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod gate;
pub mod handlers;
pub mod state;

use axum::{
    http::HeaderName,
    middleware,
    routing::{get, post},
    Router,
};
use pairagent_payments::x402::PAYMENT_RESPONSE_HEADER;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::AppState;

/// Create the router with all middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    let agents = Router::new()
        .route("/api/agents/pricing", post(handlers::agents::pricing))
        .route("/api/agents/routing", post(handlers::agents::routing))
        .route("/api/agents/slot", post(handlers::agents::slot))
        .route("/api/agents/weather", post(handlers::agents::weather))
        .route_layer(middleware::from_fn_with_state(state.clone(), gate::x402_gate));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(PAYMENT_RESPONSE_HEADER)]);

    Router::new()
        .merge(agents)
        .route("/api/orchestrate", post(handlers::orchestrate::orchestrate))
        .route("/api/registry", get(handlers::registry::list_agents))
        .route("/api/registry/:id", get(handlers::registry::get_agent))
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(cors)
}
