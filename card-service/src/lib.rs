pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use service_core::axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use service_core::middleware::{
    http_trace_layer, metrics_middleware, request_id_middleware, security_headers_middleware,
};
use std::sync::Arc;

use crate::config::CardConfig;
use crate::services::{CardService, CredentialStore};

#[derive(Clone)]
pub struct AppState {
    pub config: CardConfig,
    pub credentials: Arc<dyn CredentialStore>,
    pub cards: CardService,
}

pub fn build_router(state: AppState) -> Router {
    // Everything under /cards, unmatched paths included, is authenticated
    // before the role check. The last layer runs first.
    let card_routes = Router::new()
        .route("/", get(handlers::list_cards).post(handlers::create_card))
        .route(
            "/:id",
            get(handlers::get_card)
                .put(handlers::update_card)
                .delete(handlers::delete_card),
        )
        .fallback(handlers::unknown_card_route)
        .layer(from_fn_with_state(state.clone(), middleware::require_role))
        .layer(from_fn_with_state(state.clone(), middleware::authenticate));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .nest("/cards", card_routes)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
}
