use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use pizzeria_catalog::InventorySnapshot;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddStockParams {
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct AddStockResponse {
    pub message: String,
    pub ingredient_name: String,
    pub quantity_added: i64,
    pub new_stock: u32,
}

#[derive(Debug, Serialize)]
pub struct IngredientStock {
    pub name: String,
    pub stock: u32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(get_inventory))
        .route("/inventory/ingredients", get(list_ingredients))
        .route("/inventory/ingredients/{name}/add", post(add_stock))
}

/// GET /inventory
async fn get_inventory(State(state): State<AppState>) -> Json<InventorySnapshot> {
    Json(state.orders.inventory().await)
}

/// GET /inventory/ingredients
/// Flat list of every ingredient, dough first
async fn list_ingredients(State(state): State<AppState>) -> Json<Vec<IngredientStock>> {
    let snapshot = state.orders.inventory().await;
    let ingredients = snapshot
        .base_ingredients
        .into_iter()
        .chain(snapshot.toppings)
        .map(|entry| IngredientStock {
            name: entry.name,
            stock: entry.quantity,
        })
        .collect();
    Json(ingredients)
}

/// POST /inventory/ingredients/{name}/add?quantity=N
async fn add_stock(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<AddStockParams>,
) -> Result<Json<AddStockResponse>, AppError> {
    let new_stock = state.orders.add_stock(&name, params.quantity).await?;
    Ok(Json(AddStockResponse {
        message: format!("Added {} to '{}'", params.quantity, name),
        ingredient_name: name,
        quantity_added: params.quantity,
        new_stock,
    }))
}
