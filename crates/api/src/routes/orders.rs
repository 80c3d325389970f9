//! Order placement and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use domain::{CustomerOrder, NewOrderRequest};
use orchestrator::{OrderOrchestrator, ResourceClient};
use order_store::{OrderId, OrderRepository};
use serde::Deserialize;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<C: ResourceClient, R: OrderRepository> {
    pub orchestrator: OrderOrchestrator<C, R>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerSearch {
    #[serde(rename = "custId")]
    pub cust_id: String,
}

/// POST /orders: place a new order from four resource references.
#[tracing::instrument(skip(state, request))]
pub async fn create<C: ResourceClient, R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<C, R>>>,
    Json(request): Json<NewOrderRequest>,
) -> Result<(StatusCode, Json<CustomerOrder>), ApiError> {
    if let Some(tag) = request.simulate.as_deref() {
        tracing::debug!(simulate = tag, "request carries a simulation tag");
    }
    let order = state.orchestrator.place_order(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders: every stored order.
#[tracing::instrument(skip(state))]
pub async fn list<C: ResourceClient, R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<C, R>>>,
) -> Result<Json<Vec<CustomerOrder>>, ApiError> {
    Ok(Json(state.orchestrator.list_orders().await?))
}

/// GET /orders/{id}: a single stored order.
#[tracing::instrument(skip(state))]
pub async fn get<C: ResourceClient, R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<C, R>>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerOrder>, ApiError> {
    let order_id = parse_order_id(&id)?;
    state
        .orchestrator
        .find_order(order_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))
}

/// GET /orders/search/customerId?custId=: orders placed by one customer.
#[tracing::instrument(skip(state))]
pub async fn search_by_customer<C: ResourceClient, R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<C, R>>>,
    Query(search): Query<CustomerSearch>,
) -> Result<Json<Vec<CustomerOrder>>, ApiError> {
    Ok(Json(
        state.orchestrator.orders_for_customer(&search.cust_id).await?,
    ))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
