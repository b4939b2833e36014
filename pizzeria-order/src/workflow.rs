use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::manager::OrderError;
use crate::models::{Order, OrderStatus};

/// Administrator-invoked forward step of the order workflow.
///
/// Each step has exactly one prior status; there is no skipping and no way
/// back. Cancellation is not a step, it removes the order from the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Start,
    MarkReady,
    Dispatch,
    MarkDelivered,
}

impl Transition {
    pub fn required(self) -> OrderStatus {
        match self {
            Transition::Start => OrderStatus::Pending,
            Transition::MarkReady => OrderStatus::Preparing,
            Transition::Dispatch => OrderStatus::ReadyForDelivery,
            Transition::MarkDelivered => OrderStatus::InDelivery,
        }
    }

    pub fn target(self) -> OrderStatus {
        match self {
            Transition::Start => OrderStatus::Preparing,
            Transition::MarkReady => OrderStatus::ReadyForDelivery,
            Transition::Dispatch => OrderStatus::InDelivery,
            Transition::MarkDelivered => OrderStatus::Delivered,
        }
    }

    /// Action segment used by the admin endpoints
    pub fn action(self) -> &'static str {
        match self {
            Transition::Start => "start",
            Transition::MarkReady => "ready",
            Transition::Dispatch => "deliver",
            Transition::MarkDelivered => "delivered",
        }
    }

    pub fn from_action(action: &str) -> Option<Transition> {
        match action {
            "start" => Some(Transition::Start),
            "ready" => Some(Transition::MarkReady),
            "deliver" => Some(Transition::Dispatch),
            "delivered" => Some(Transition::MarkDelivered),
            _ => None,
        }
    }

    /// The step leaving `status`, if any
    pub fn from_status(status: OrderStatus) -> Option<Transition> {
        match status {
            OrderStatus::Pending => Some(Transition::Start),
            OrderStatus::Preparing => Some(Transition::MarkReady),
            OrderStatus::ReadyForDelivery => Some(Transition::Dispatch),
            OrderStatus::InDelivery => Some(Transition::MarkDelivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Apply the step to `order`, stamping the matching timestamp.
    pub fn apply(self, order: &mut Order, now: DateTime<Utc>) -> Result<(), OrderError> {
        if order.status != self.required() {
            return Err(OrderError::IllegalTransition {
                action: self.action(),
                current: order.status,
                required: self.required(),
            });
        }

        order.status = self.target();
        match self {
            Transition::Start => order.started_at = Some(now),
            Transition::MarkReady => order.ready_at = Some(now),
            Transition::Dispatch => {}
            Transition::MarkDelivered => order.delivered_at = Some(now),
        }
        Ok(())
    }
}

pub fn progress_percent(status: OrderStatus) -> u8 {
    match status {
        OrderStatus::Pending => 0,
        OrderStatus::Preparing => 25,
        OrderStatus::ReadyForDelivery => 50,
        OrderStatus::InDelivery => 75,
        OrderStatus::Delivered => 100,
        OrderStatus::Cancelled => 0,
    }
}

pub fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "En attente",
        OrderStatus::Preparing => "En préparation",
        OrderStatus::ReadyForDelivery => "Prête pour livraison",
        OrderStatus::InDelivery => "En cours de livraison",
        OrderStatus::Delivered => "Livrée",
        OrderStatus::Cancelled => "Annulée",
    }
}

/// Read-only tracking view of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusView {
    pub order_id: u64,
    pub status: OrderStatus,
    pub status_label: String,
    pub progress_percent: u8,
    pub estimated_delivery_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl From<&Order> for StatusView {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            status: order.status,
            status_label: status_label(order.status).to_string(),
            progress_percent: progress_percent(order.status),
            estimated_delivery_minutes: order.estimated_delivery_minutes,
            created_at: order.created_at,
            started_at: order.started_at,
            ready_at: order.ready_at,
            delivered_at: order.delivered_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewOrder;
    use pizzeria_shared::Address;

    fn pending_order() -> Order {
        Order::new(
            7,
            NewOrder {
                customer_name: "Paul".to_string(),
                customer_address: Address::new("1", "Place du Capitole", "Toulouse", "31000"),
                pizzas: vec![],
                estimated_delivery_minutes: 30,
            },
        )
    }

    #[test]
    fn test_steps_chain_forward() {
        let mut status = OrderStatus::Pending;
        let mut steps = vec![];
        while let Some(step) = Transition::from_status(status) {
            assert_eq!(step.required(), status);
            steps.push(step);
            status = step.target();
        }
        assert_eq!(status, OrderStatus::Delivered);
        assert_eq!(
            steps,
            vec![
                Transition::Start,
                Transition::MarkReady,
                Transition::Dispatch,
                Transition::MarkDelivered
            ]
        );
    }

    #[test]
    fn test_action_segments() {
        for step in [
            Transition::Start,
            Transition::MarkReady,
            Transition::Dispatch,
            Transition::MarkDelivered,
        ] {
            assert_eq!(Transition::from_action(step.action()), Some(step));
        }
        assert_eq!(Transition::from_action("cancel"), None);
    }

    #[test]
    fn test_apply_stamps_timestamps() {
        let mut order = pending_order();
        let now = Utc::now();

        Transition::Start.apply(&mut order, now).unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.started_at, Some(now));

        Transition::MarkReady.apply(&mut order, now).unwrap();
        Transition::Dispatch.apply(&mut order, now).unwrap();
        assert_eq!(order.status, OrderStatus::InDelivery);
        assert!(order.delivered_at.is_none());

        Transition::MarkDelivered.apply(&mut order, now).unwrap();
        assert_eq!(order.delivered_at, Some(now));
    }

    #[test]
    fn test_apply_rejects_skipping() {
        let mut order = pending_order();
        let err = Transition::MarkReady.apply(&mut order, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            OrderError::IllegalTransition {
                current: OrderStatus::Pending,
                required: OrderStatus::Preparing,
                ..
            }
        ));
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.ready_at.is_none());
    }

    #[test]
    fn test_status_view_progress() {
        let mut order = pending_order();
        assert_eq!(StatusView::from(&order).progress_percent, 0);
        assert_eq!(StatusView::from(&order).status_label, "En attente");

        order.status = OrderStatus::InDelivery;
        let view = StatusView::from(&order);
        assert_eq!(view.progress_percent, 75);
        assert_eq!(view.status_label, "En cours de livraison");

        assert_eq!(progress_percent(OrderStatus::Delivered), 100);
        assert_eq!(progress_percent(OrderStatus::Cancelled), 0);
    }
}
