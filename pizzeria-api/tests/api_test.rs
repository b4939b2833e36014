use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pizzeria_api::{app, AppState};
use pizzeria_core::LocalAddressValidator;
use pizzeria_order::{OrderService, ServiceConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    let service = OrderService::new(
        Arc::new(LocalAddressValidator::default()),
        ServiceConfig::default(),
    );
    app(AppState::new(service))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn margherita_order(customer: &str) -> Value {
    json!({
        "pizzas": [{"name": "Margherita", "size": "medium", "toppings": ["tomate", "mozzarella", "basilic"]}],
        "customer_name": customer,
        "customer_address": {
            "street_number": "22",
            "street": "Rue du Taur",
            "city": "Toulouse",
            "postal_code": "31000"
        }
    })
}

fn stock_of(inventory: &Value, name: &str) -> u64 {
    inventory["base_ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .chain(inventory["toppings"].as_array().unwrap())
        .find(|entry| entry["name"] == name)
        .unwrap()["quantity"]
        .as_u64()
        .unwrap()
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Bienvenue sur l'API de Livraison de Pizza");
    assert!(body["endpoints"].as_array().unwrap().len() > 5);
}

#[tokio::test]
async fn test_menus_and_pricing_info() {
    let app = test_app();

    let (status, menu) = send(&app, Method::GET, "/pizzas/menu", None).await;
    assert_eq!(status, StatusCode::OK);
    let margherita = menu
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "Margherita")
        .unwrap();
    assert_eq!(margherita["prices"]["medium"], 8.0);

    let (status, toppings) = send(&app, Method::GET, "/topping/menu", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(toppings.as_array().unwrap().iter().all(|t| t["name"] != "pate"));

    let (status, info) = send(&app, Method::GET, "/pricing/info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["delivery_fee"], 5.0);
    assert_eq!(info["free_delivery_threshold"], 30.0);
}

#[tokio::test]
async fn test_create_and_fetch_order() {
    let app = test_app();
    let (_, before) = send(&app, Method::GET, "/inventory", None).await;

    let (status, summary) = send(&app, Method::POST, "/orders", Some(margherita_order("Jean Dupont"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(summary["order_id"], 1);
    assert_eq!(summary["customer_name"], "Jean Dupont");
    assert_eq!(summary["subtotal"], 8.0);
    assert_eq!(summary["delivery_fee"], 5.0);
    assert_eq!(summary["total"], 13.0);
    assert_eq!(summary["is_delivery_free"], false);
    assert_eq!(summary["status"], "pending");
    assert_eq!(summary["estimated_delivery_minutes"], 30);
    assert_eq!(summary["pizzas"][0]["price"], 8.0);

    let (_, after) = send(&app, Method::GET, "/inventory", None).await;
    for name in ["pate", "tomate", "mozzarella", "basilic"] {
        assert_eq!(stock_of(&after, name), stock_of(&before, name) - 1);
    }
    assert_eq!(stock_of(&after, "jambon"), stock_of(&before, "jambon"));

    let (status, fetched) = send(&app, Method::GET, "/orders/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, summary);

    let (status, list) = send(&app, Method::GET, "/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_order_error_statuses() {
    let app = test_app();

    let mut empty = margherita_order("Jean");
    empty["pizzas"] = json!([]);
    let (status, body) = send(&app, Method::POST, "/orders", Some(empty)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("at least one pizza"));

    let (status, _) = send(&app, Method::POST, "/orders", Some(margherita_order("  "))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut unknown = margherita_order("Jean");
    unknown["pizzas"][0]["name"] = json!("Hawaienne");
    let (status, _) = send(&app, Method::POST, "/orders", Some(unknown)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut bad_size = margherita_order("Jean");
    bad_size["pizzas"][0]["size"] = json!("xxl");
    let (status, _) = send(&app, Method::POST, "/orders", Some(bad_size)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut paris = margherita_order("Jean");
    paris["customer_address"]["city"] = json!("Paris");
    let (status, _) = send(&app, Method::POST, "/orders", Some(paris)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // clients cannot set their own price
    let mut priced = margherita_order("Jean");
    priced["pizzas"][0]["price"] = json!(1.0);
    let (status, _) = send(&app, Method::POST, "/orders", Some(priced)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, list) = send(&app, Method::GET, "/orders", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_out_of_stock_is_conflict() {
    let app = test_app();

    // 40 olives in stock, each végétarienne uses one
    let mut order = margherita_order("Jean");
    order["pizzas"] = json!([{
        "name": "Végétarienne",
        "size": "small",
        "toppings": ["tomate", "mozzarella", "poivrons", "oignons", "olives"]
    }]);
    for _ in 0..40 {
        let (status, _) = send(&app, Method::POST, "/orders", Some(order.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::POST, "/orders", Some(order)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("poivrons"));
}

#[tokio::test]
async fn test_cancel_order() {
    let app = test_app();
    send(&app, Method::POST, "/orders", Some(margherita_order("Jean"))).await;

    let (status, body) = send(&app, Method::DELETE, "/orders/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "cancelled");

    let (status, _) = send(&app, Method::GET, "/orders/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, "/orders/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_workflow() {
    let app = test_app();
    send(&app, Method::POST, "/orders", Some(margherita_order("Jean"))).await;

    let (status, body) = send(&app, Method::POST, "/admin/orders/1/ready", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("pending"));

    for (action, expected) in [
        ("start", "preparing"),
        ("ready", "ready_for_delivery"),
        ("deliver", "in_delivery"),
        ("delivered", "delivered"),
    ] {
        let (status, body) = send(&app, Method::POST, &format!("/admin/orders/1/{}", action), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["order"]["status"], expected);
    }

    let (status, view) = send(&app, Method::GET, "/orders/1/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["progress_percent"], 100);
    assert_eq!(view["status_label"], "Livrée");
    assert!(!view["delivered_at"].is_null());

    let (status, _) = send(&app, Method::POST, "/admin/orders/9/start", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::POST, "/admin/orders/1/teleport", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_dashboard_groups_by_status() {
    let app = test_app();
    send(&app, Method::POST, "/orders", Some(margherita_order("A"))).await;
    send(&app, Method::POST, "/orders", Some(margherita_order("B"))).await;
    send(&app, Method::POST, "/admin/orders/2/start", None).await;

    let (status, body) = send(&app, Method::GET, "/admin/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_orders"], 2);

    let groups = body["orders_by_status"].as_object().unwrap();
    assert_eq!(groups.len(), 5);
    assert_eq!(groups["pending"].as_array().unwrap().len(), 1);
    assert_eq!(groups["preparing"].as_array().unwrap().len(), 1);
    assert!(groups["delivered"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_stock() {
    let app = test_app();

    let (status, body) = send(&app, Method::POST, "/inventory/ingredients/tomate/add?quantity=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ingredient_name"], "tomate");
    assert_eq!(body["quantity_added"], 10);
    assert_eq!(body["new_stock"], 110);

    let (status, body) = send(&app, Method::POST, "/inventory/ingredients/tomate/add?quantity=-5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("positive"));

    let (status, _) = send(&app, Method::POST, "/inventory/ingredients/IngredientFantome/add?quantity=10", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::POST, "/inventory/ingredients/tomate/add?quantity=4294967295", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("cannot exceed"));
    let (_, inventory) = send(&app, Method::GET, "/inventory", None).await;
    assert_eq!(stock_of(&inventory, "tomate"), 110);

    let (status, list) = send(&app, Method::GET, "/inventory/ingredients", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["name"], "pate");
}
