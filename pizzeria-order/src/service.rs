use pizzeria_catalog::pricing::{MenuEntry, PricingConfig};
use pizzeria_catalog::{
    cents_to_amount, product, InventoryError, InventoryManager, InventorySnapshot, PizzaSize,
    PricingEngine,
};
use pizzeria_core::{AddressValidator, AddressVerdict, InventoryRepository};
use pizzeria_shared::{Address, Masked};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::manager::{OrderError, OrderManager};
use crate::models::{NewOrder, Order, OrderStatus, PizzaSpec, PricedPizza};
use crate::workflow::{StatusView, Transition};

/// Body of an order creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub pizzas: Vec<PizzaSpec>,
    pub customer_name: String,
    pub customer_address: Address,
}

/// Delivery time promised to the customer at creation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryEstimate {
    pub base_minutes: u32,
    pub per_pizza_minutes: u32,
}

impl DeliveryEstimate {
    pub fn minutes(&self, pizza_count: usize) -> u32 {
        let extra = u32::try_from(pizza_count.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_minutes
            .saturating_add(self.per_pizza_minutes.saturating_mul(extra))
    }
}

impl Default for DeliveryEstimate {
    fn default() -> Self {
        Self {
            base_minutes: 30,
            per_pizza_minutes: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub pricing: PricingConfig,
    pub delivery: DeliveryEstimate,
    /// Upper bound for one address validator call
    pub address_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            delivery: DeliveryEstimate::default(),
            address_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToppingPrice {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingInfo {
    pub delivery_fee: f64,
    pub free_delivery_threshold: f64,
}

/// Entry point for everything the HTTP layer does with orders and stock.
///
/// Lock order is inventory, then orders. The inventory lock spans the stock
/// check, the stock commit and the identifier assignment of one creation, so
/// concurrent orders can neither oversell nor share an identifier.
///
/// With a stock repository configured, the inventory lock is also held while
/// the touched counters are written, so stored rows are updated in the same
/// order as memory. Stock mutations are therefore serialized behind one
/// database round-trip each (bounded by the pool acquire timeout).
pub struct OrderService {
    pricing: PricingEngine,
    inventory: Mutex<InventoryManager>,
    orders: Mutex<OrderManager>,
    validator: Arc<dyn AddressValidator>,
    stock_repo: Option<Arc<dyn InventoryRepository>>,
    config: ServiceConfig,
}

impl OrderService {
    pub fn new(validator: Arc<dyn AddressValidator>, config: ServiceConfig) -> Self {
        Self {
            pricing: PricingEngine::new(config.pricing.clone()),
            inventory: Mutex::new(InventoryManager::new()),
            orders: Mutex::new(OrderManager::new()),
            validator,
            stock_repo: None,
            config,
        }
    }

    pub fn with_inventory(mut self, inventory: InventoryManager) -> Self {
        self.inventory = Mutex::new(inventory);
        self
    }

    pub fn with_stock_repository(mut self, repo: Arc<dyn InventoryRepository>) -> Self {
        self.stock_repo = Some(repo);
        self
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    /// Load persisted counters into the inventory, or seed the store with the
    /// defaults when it is empty. Returns how many counters were restored.
    pub async fn restore_stock(&self) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        let Some(repo) = &self.stock_repo else {
            return Ok(0);
        };

        let rows = repo.load_stock().await?;
        let mut inventory = self.inventory.lock().await;

        if rows.is_empty() {
            repo.save_stock(&inventory.counters()).await?;
            info!("Persistent inventory was empty, seeded with default stock");
            return Ok(0);
        }

        let mut restored = 0;
        for (name, quantity) in rows {
            if inventory.set_quantity(&name, quantity) {
                restored += 1;
            } else {
                warn!("Ignoring stored stock for unknown ingredient '{}'", name);
            }
        }
        info!("Restored {} inventory counters from storage", restored);
        Ok(restored)
    }

    /// Validate, check stock, price, commit stock and store a new order.
    /// Nothing is mutated unless every step succeeds.
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
        let customer = Masked(request.customer_name.clone());
        let result = self.place_order(request).await;
        match &result {
            Ok(order) => info!(
                "Order {} created for {:?}: {} pizza(s), subtotal {:.2}",
                order.id,
                customer,
                order.pizzas.len(),
                cents_to_amount(order.subtotal_cents())
            ),
            Err(e) => warn!("Order rejected for {:?}: {}", customer, e),
        }
        result
    }

    async fn place_order(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
        if request.pizzas.is_empty() {
            return Err(OrderError::Validation(
                "An order must contain at least one pizza".to_string(),
            ));
        }
        let customer_name = request.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(OrderError::Validation("Customer name is required".to_string()));
        }

        let sizes = request
            .pizzas
            .iter()
            .map(validate_pizza)
            .collect::<Result<Vec<_>, _>>()?;

        self.check_address(&request.customer_address).await?;

        let mut inventory = self.inventory.lock().await;
        inventory
            .can_fulfill(request.pizzas.iter().map(|p| p.toppings.as_slice()))
            .map_err(inventory_error)?;

        let pizzas: Vec<PricedPizza> = request
            .pizzas
            .iter()
            .zip(sizes)
            .map(|(spec, size)| PricedPizza {
                name: spec.name.trim().to_string(),
                size,
                toppings: spec.toppings.clone(),
                price_cents: self.pricing.price(&spec.name, size.as_str(), &spec.toppings),
            })
            .collect();

        let touched = inventory
            .reduce(pizzas.iter().map(|p| p.toppings.as_slice()))
            .map_err(inventory_error)?;

        let estimated_delivery_minutes = self.config.delivery.minutes(pizzas.len());
        let order = self.orders.lock().await.create_order(NewOrder {
            customer_name,
            customer_address: request.customer_address,
            pizzas,
            estimated_delivery_minutes,
        });

        self.persist(&touched).await;
        Ok(order)
    }

    async fn check_address(&self, address: &Address) -> Result<(), OrderError> {
        let lookup = self.validator.validate(address);
        match tokio::time::timeout(self.config.address_timeout, lookup).await {
            Ok(Ok(AddressVerdict::Valid)) => Ok(()),
            Ok(Ok(AddressVerdict::Invalid(reason))) => Err(OrderError::SchemaRejection(format!(
                "Invalid address '{}': {}",
                address, reason
            ))),
            Ok(Err(e)) => Err(OrderError::SchemaRejection(format!(
                "Address '{}' could not be verified: {}",
                address, e
            ))),
            Err(_) => Err(OrderError::SchemaRejection(format!(
                "Address validation timed out for '{}'",
                address
            ))),
        }
    }

    pub async fn get_order(&self, order_id: u64) -> Result<Order, OrderError> {
        self.orders
            .lock()
            .await
            .get_order(order_id)
            .cloned()
            .ok_or(OrderError::OrderNotFound(order_id))
    }

    pub async fn list_orders(&self) -> Vec<Order> {
        self.orders.lock().await.list_all()
    }

    /// Remove an order. Stock consumed by the order is not given back.
    pub async fn cancel_order(&self, order_id: u64) -> Result<Order, OrderError> {
        let order = self.orders.lock().await.cancel_order(order_id)?;
        info!("Order {} cancelled", order_id);
        Ok(order)
    }

    pub async fn transition(&self, order_id: u64, step: Transition) -> Result<Order, OrderError> {
        let order = self.orders.lock().await.transition(order_id, step)?;
        info!("Order {} moved to {}", order_id, order.status);
        Ok(order)
    }

    pub async fn start(&self, order_id: u64) -> Result<Order, OrderError> {
        self.transition(order_id, Transition::Start).await
    }

    pub async fn mark_ready(&self, order_id: u64) -> Result<Order, OrderError> {
        self.transition(order_id, Transition::MarkReady).await
    }

    pub async fn dispatch(&self, order_id: u64) -> Result<Order, OrderError> {
        self.transition(order_id, Transition::Dispatch).await
    }

    pub async fn mark_delivered(&self, order_id: u64) -> Result<Order, OrderError> {
        self.transition(order_id, Transition::MarkDelivered).await
    }

    pub async fn status_view(&self, order_id: u64) -> Result<StatusView, OrderError> {
        let orders = self.orders.lock().await;
        let order = orders
            .get_order(order_id)
            .ok_or(OrderError::OrderNotFound(order_id))?;
        Ok(StatusView::from(order))
    }

    pub async fn orders_by_status(&self) -> Vec<(OrderStatus, Vec<Order>)> {
        self.orders.lock().await.orders_by_status()
    }

    pub async fn inventory(&self) -> InventorySnapshot {
        self.inventory.lock().await.get_full_inventory()
    }

    /// Restock a known ingredient and return its new level
    pub async fn add_stock(&self, name: &str, amount: i64) -> Result<u32, OrderError> {
        if amount <= 0 {
            return Err(OrderError::Validation("Quantity must be positive".to_string()));
        }
        let amount = u32::try_from(amount)
            .map_err(|_| OrderError::Validation(format!("Quantity {} is too large", amount)))?;

        let mut inventory = self.inventory.lock().await;
        let new_stock = inventory
            .add_stock(name, amount)
            .map_err(inventory_error)?;

        self.persist(&[(name.trim().to_lowercase(), new_stock)]).await;
        info!("Restocked '{}' by {}, now {}", name, amount, new_stock);
        Ok(new_stock)
    }

    pub fn pizza_menu(&self) -> Vec<MenuEntry> {
        self.pricing.menu()
    }

    /// Every topping ingredient with its extra-topping surcharge
    pub async fn topping_menu(&self) -> Vec<ToppingPrice> {
        self.inventory()
            .await
            .toppings
            .into_iter()
            .map(|entry| ToppingPrice {
                price: cents_to_amount(self.pricing.topping_surcharge(&entry.name)),
                name: entry.name,
            })
            .collect()
    }

    pub fn pricing_info(&self) -> PricingInfo {
        let config = self.pricing.config();
        PricingInfo {
            delivery_fee: cents_to_amount(config.delivery_fee_cents),
            free_delivery_threshold: cents_to_amount(config.free_delivery_threshold_cents),
        }
    }

    async fn persist(&self, entries: &[(String, u32)]) {
        let Some(repo) = &self.stock_repo else {
            return;
        };
        if let Err(e) = repo.save_stock(entries).await {
            warn!("Failed to persist {} inventory counter(s): {}", entries.len(), e);
        }
    }
}

fn validate_pizza(spec: &PizzaSpec) -> Result<PizzaSize, OrderError> {
    if product::resolve(&spec.name).is_none() {
        return Err(OrderError::SchemaRejection(format!(
            "Unknown pizza '{}': expected one of {}",
            spec.name,
            product::accepted_names().join(", ")
        )));
    }
    spec.size
        .parse::<PizzaSize>()
        .map_err(|e| OrderError::SchemaRejection(e.to_string()))
}

fn inventory_error(err: InventoryError) -> OrderError {
    match err {
        InventoryError::Insufficient { ingredient } => {
            OrderError::StockConflict(format!("'{}' is out of stock", ingredient))
        }
        InventoryError::UnknownIngredient(name) => OrderError::IngredientNotFound(name),
        err @ InventoryError::StockLimit { .. } => OrderError::Validation(err.to_string()),
    }
}
