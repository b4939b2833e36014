use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use pizzeria_order::{Order, OrderStatus, Transition};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_orders: usize,
    pub orders_by_status: BTreeMap<OrderStatus, Vec<Order>>,
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub message: String,
    pub order: Order,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/orders", get(dashboard))
        .route("/admin/orders/{id}/{action}", post(advance_order))
}

/// GET /admin/orders
/// Live orders grouped by workflow status
async fn dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let grouped = state.orders.orders_by_status().await;
    let total_orders = grouped.iter().map(|(_, orders)| orders.len()).sum();
    Json(DashboardResponse {
        total_orders,
        orders_by_status: grouped.into_iter().collect(),
    })
}

/// POST /admin/orders/{id}/{start|ready|deliver|delivered}
async fn advance_order(
    State(state): State<AppState>,
    Path((order_id, action)): Path<(u64, String)>,
) -> Result<Json<TransitionResponse>, AppError> {
    let step = Transition::from_action(&action)
        .ok_or_else(|| AppError::NotFoundError(format!("Unknown action '{}'", action)))?;

    let order = state.orders.transition(order_id, step).await?;
    Ok(Json(TransitionResponse {
        message: format!("Order {} is now {}", order_id, order.status),
        order,
    }))
}
