use axum::{http::Method, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod error;
pub mod inventory;
pub mod menu;
pub mod orders;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .route("/", get(root))
        .merge(menu::routes())
        .merge(orders::routes())
        .merge(inventory::routes())
        .merge(admin::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /
async fn root() -> Json<Value> {
    Json(json!({
        "message": "Bienvenue sur l'API de Livraison de Pizza",
        "endpoints": [
            "GET /pizzas/menu",
            "GET /topping/menu",
            "GET /pricing/info",
            "POST /orders",
            "GET /orders",
            "GET /orders/{id}",
            "DELETE /orders/{id}",
            "GET /orders/{id}/status",
            "GET /inventory",
            "GET /inventory/ingredients",
            "POST /inventory/ingredients/{name}/add?quantity=N",
            "GET /admin/orders",
            "POST /admin/orders/{id}/{start|ready|deliver|delivered}",
        ],
    }))
}
