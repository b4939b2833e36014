use axum::{extract::State, routing::get, Json, Router};
use pizzeria_catalog::pricing::MenuEntry;
use pizzeria_order::{PricingInfo, ToppingPrice};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pizzas/menu", get(pizza_menu))
        .route("/topping/menu", get(topping_menu))
        .route("/pricing/info", get(pricing_info))
}

/// GET /pizzas/menu
async fn pizza_menu(State(state): State<AppState>) -> Json<Vec<MenuEntry>> {
    Json(state.orders.pizza_menu())
}

/// GET /topping/menu
async fn topping_menu(State(state): State<AppState>) -> Json<Vec<ToppingPrice>> {
    Json(state.orders.topping_menu().await)
}

/// GET /pricing/info
async fn pricing_info(State(state): State<AppState>) -> Json<PricingInfo> {
    Json(state.orders.pricing_info())
}
