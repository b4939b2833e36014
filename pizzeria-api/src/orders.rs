use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pizzeria_order::{CreateOrderRequest, OrderSummary, StatusView};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub message: String,
    pub order: OrderSummary,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/{id}", get(get_order).delete(cancel_order))
        .route("/orders/{id}/status", get(order_status))
}

/// POST /orders
/// Validate, price and store a new order
async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderSummary>), AppError> {
    let order = state.orders.create_order(req).await?;
    Ok((StatusCode::CREATED, Json(order.summary(state.orders.pricing()))))
}

/// GET /orders
async fn list_orders(State(state): State<AppState>) -> Json<Vec<OrderSummary>> {
    let pricing = state.orders.pricing();
    let summaries = state
        .orders
        .list_orders()
        .await
        .iter()
        .map(|order| order.summary(pricing))
        .collect();
    Json(summaries)
}

/// GET /orders/{id}
async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
) -> Result<Json<OrderSummary>, AppError> {
    let order = state.orders.get_order(order_id).await?;
    Ok(Json(order.summary(state.orders.pricing())))
}

/// DELETE /orders/{id}
async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
) -> Result<Json<CancelResponse>, AppError> {
    let order = state.orders.cancel_order(order_id).await?;
    Ok(Json(CancelResponse {
        message: format!("Order {} cancelled", order_id),
        order: order.summary(state.orders.pricing()),
    }))
}

/// GET /orders/{id}/status
async fn order_status(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
) -> Result<Json<StatusView>, AppError> {
    Ok(Json(state.orders.status_view(order_id).await?))
}
