pub mod manager;
pub mod models;
pub mod service;
pub mod workflow;

pub use manager::{OrderError, OrderManager};
pub use models::{NewOrder, Order, OrderStatus, OrderSummary, PizzaLine, PizzaSpec, PricedPizza};
pub use service::{
    CreateOrderRequest, DeliveryEstimate, OrderService, PricingInfo, ServiceConfig, ToppingPrice,
};
pub use workflow::{progress_percent, status_label, StatusView, Transition};
