//! HTTP API server for order placement.
//!
//! Exposes the order orchestrator over REST, with structured logging
//! (tracing), Prometheus metrics and optional fault injection on the
//! order routes.

pub mod chaos;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use orchestrator::{OrchestratorConfig, OrderOrchestrator, ResourceClient};
use order_store::OrderRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use chaos::Chaos;
use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, R>(
    state: Arc<AppState<C, R>>,
    metrics_handle: PrometheusHandle,
    chaos: Chaos,
) -> Router
where
    C: ResourceClient,
    R: OrderRepository + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let orders_router = Router::new()
        .route(
            "/orders",
            post(routes::orders::create::<C, R>).get(routes::orders::list::<C, R>),
        )
        .route(
            "/orders/search/customerId",
            get(routes::orders::search_by_customer::<C, R>),
        )
        .route("/orders/{id}", get(routes::orders::get::<C, R>))
        .route_layer(axum::middleware::from_fn_with_state(
            chaos,
            chaos::simulate_faults,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(routes::health::check))
        .merge(orders_router)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around a resource client and an order store.
pub fn create_state<C, R>(client: C, repository: R, config: OrchestratorConfig) -> Arc<AppState<C, R>>
where
    C: ResourceClient,
    R: OrderRepository,
{
    Arc::new(AppState {
        orchestrator: OrderOrchestrator::new(client, repository, config),
    })
}
