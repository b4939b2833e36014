pub mod product;
pub mod pricing;
pub mod inventory;

pub use product::{PizzaRecipe, PizzaSize, BASE_INGREDIENT};
pub use pricing::{cents_to_amount, PricingEngine};
pub use inventory::{InventoryError, InventoryManager, InventorySnapshot, StockEntry, MAX_STOCK};
