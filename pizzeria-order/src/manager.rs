use crate::models::{NewOrder, Order, OrderStatus};
use crate::workflow::Transition;
use chrono::Utc;
use std::collections::BTreeMap;

/// Owns every live order and the identifier sequence.
///
/// Identifiers start at 1, increase by one per stored order and are never
/// handed out twice, not even after a cancellation.
pub struct OrderManager {
    orders: BTreeMap<u64, Order>,
    next_id: u64,
}

impl OrderManager {
    pub fn new() -> Self {
        Self {
            orders: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Store a validated order under the next identifier
    pub fn create_order(&mut self, new_order: NewOrder) -> Order {
        let id = self.next_id;
        self.next_id += 1;

        let order = Order::new(id, new_order);
        self.orders.insert(id, order.clone());
        order
    }

    /// Get an order by ID
    pub fn get_order(&self, order_id: u64) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// All live orders in creation order
    pub fn list_all(&self) -> Vec<Order> {
        self.orders.values().cloned().collect()
    }

    /// Live orders grouped by status, every active status present, workflow order
    pub fn orders_by_status(&self) -> Vec<(OrderStatus, Vec<Order>)> {
        OrderStatus::ACTIVE
            .iter()
            .map(|status| {
                let orders = self
                    .orders
                    .values()
                    .filter(|o| o.status == *status)
                    .cloned()
                    .collect();
                (*status, orders)
            })
            .collect()
    }

    /// Remove an order whatever its status. The returned copy is marked cancelled.
    pub fn cancel_order(&mut self, order_id: u64) -> Result<Order, OrderError> {
        let mut order = self
            .orders
            .remove(&order_id)
            .ok_or(OrderError::OrderNotFound(order_id))?;
        order.status = OrderStatus::Cancelled;
        Ok(order)
    }

    /// Transition: Pending → Preparing
    pub fn start(&mut self, order_id: u64) -> Result<Order, OrderError> {
        self.transition(order_id, Transition::Start)
    }

    /// Transition: Preparing → ReadyForDelivery
    pub fn mark_ready(&mut self, order_id: u64) -> Result<Order, OrderError> {
        self.transition(order_id, Transition::MarkReady)
    }

    /// Transition: ReadyForDelivery → InDelivery
    pub fn dispatch(&mut self, order_id: u64) -> Result<Order, OrderError> {
        self.transition(order_id, Transition::Dispatch)
    }

    /// Transition: InDelivery → Delivered
    pub fn mark_delivered(&mut self, order_id: u64) -> Result<Order, OrderError> {
        self.transition(order_id, Transition::MarkDelivered)
    }

    pub fn transition(&mut self, order_id: u64, step: Transition) -> Result<Order, OrderError> {
        let order = self.get_order_mut(order_id)?;
        step.apply(order, Utc::now())?;
        Ok(order.clone())
    }

    fn get_order_mut(&mut self, order_id: u64) -> Result<&mut Order, OrderError> {
        self.orders
            .get_mut(&order_id)
            .ok_or(OrderError::OrderNotFound(order_id))
    }
}

impl Default for OrderManager {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    /// Malformed or missing required input
    #[error("{0}")]
    Validation(String),

    /// Unknown pizza name or size, or an address that failed validation
    #[error("{0}")]
    SchemaRejection(String),

    #[error("Insufficient stock: {0}")]
    StockConflict(String),

    #[error("Order {0} not found")]
    OrderNotFound(u64),

    #[error("Ingredient '{0}' not found")]
    IngredientNotFound(String),

    #[error("Cannot {action} order: status is {current}, expected {required}")]
    IllegalTransition {
        action: &'static str,
        current: OrderStatus,
        required: OrderStatus,
    },
}
