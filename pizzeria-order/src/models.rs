use chrono::{DateTime, Utc};
use pizzeria_catalog::{cents_to_amount, PizzaSize, PricingEngine};
use pizzeria_shared::Address;
use serde::{Deserialize, Serialize};

/// Order status in the delivery lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    ReadyForDelivery,
    InDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Statuses an order can hold while it is still in the store, in workflow order
    pub const ACTIVE: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::ReadyForDelivery,
        OrderStatus::InDelivery,
        OrderStatus::Delivered,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::ReadyForDelivery => "ready_for_delivery",
            OrderStatus::InDelivery => "in_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pizza as requested, before validation and pricing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PizzaSpec {
    pub name: String,
    pub size: String,
    #[serde(default)]
    pub toppings: Vec<String>,
}

impl PizzaSpec {
    pub fn new(name: &str, size: &str, toppings: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            size: size.to_string(),
            toppings: toppings.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// A pizza with the price computed when the order was placed.
/// The price is a historical record and is never recalculated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricedPizza {
    pub name: String,
    pub size: PizzaSize,
    pub toppings: Vec<String>,
    pub price_cents: i64,
}

impl PricedPizza {
    pub fn description(&self) -> String {
        format!(
            "{} ({}) - {}€",
            self.name,
            self.size,
            display_amount(cents_to_amount(self.price_cents))
        )
    }
}

/// Shortest decimal form, keeping one decimal for whole amounts ("8.0", "10.4", "13.65")
fn display_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.1}", amount)
    } else {
        amount.to_string()
    }
}

/// Validated and priced input for the order store
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_address: Address,
    pub pizzas: Vec<PricedPizza>,
    pub estimated_delivery_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: u64,
    pub pizzas: Vec<PricedPizza>,
    pub customer_name: String,
    pub customer_address: Address,
    pub status: OrderStatus,
    pub estimated_delivery_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn new(id: u64, new_order: NewOrder) -> Self {
        Self {
            id,
            pizzas: new_order.pizzas,
            customer_name: new_order.customer_name,
            customer_address: new_order.customer_address,
            status: OrderStatus::Pending,
            estimated_delivery_minutes: new_order.estimated_delivery_minutes,
            created_at: Utc::now(),
            started_at: None,
            ready_at: None,
            delivered_at: None,
        }
    }

    /// Sum of the frozen pizza prices
    pub fn subtotal_cents(&self) -> i64 {
        self.pizzas.iter().map(|p| p.price_cents).sum()
    }

    /// Customer-facing projection. Derived amounts are recomputed on every call.
    pub fn summary(&self, pricing: &PricingEngine) -> OrderSummary {
        let subtotal = self.subtotal_cents();
        let delivery_fee = pricing.delivery_fee(subtotal);

        OrderSummary {
            order_id: self.id,
            customer_name: self.customer_name.clone(),
            customer_address: self.customer_address.to_string(),
            pizzas: self.pizzas.iter().map(PizzaLine::from).collect(),
            subtotal: cents_to_amount(subtotal),
            delivery_fee: cents_to_amount(delivery_fee),
            is_delivery_free: delivery_fee == 0,
            total: cents_to_amount(subtotal + delivery_fee),
            status: self.status,
            estimated_delivery_minutes: self.estimated_delivery_minutes,
        }
    }
}

/// One pizza as shown in order views
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PizzaLine {
    pub name: String,
    pub size: PizzaSize,
    pub toppings: Vec<String>,
    pub price: f64,
    pub description: String,
}

impl From<&PricedPizza> for PizzaLine {
    fn from(pizza: &PricedPizza) -> Self {
        Self {
            name: pizza.name.clone(),
            size: pizza.size,
            toppings: pizza.toppings.clone(),
            price: cents_to_amount(pizza.price_cents),
            description: pizza.description(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSummary {
    pub order_id: u64,
    pub customer_name: String,
    pub customer_address: String,
    pub pizzas: Vec<PizzaLine>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub is_delivery_free: bool,
    pub total: f64,
    pub status: OrderStatus,
    pub estimated_delivery_minutes: u32,
}
