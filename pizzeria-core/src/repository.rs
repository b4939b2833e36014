use async_trait::async_trait;

/// Durable copy of the ingredient stock counters.
///
/// Only quantities are stored; which ingredients exist and whether they are
/// base ingredients is catalog data.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// All stored `(ingredient, quantity)` rows. Empty when nothing was saved yet.
    async fn load_stock(
        &self,
    ) -> Result<Vec<(String, u32)>, Box<dyn std::error::Error + Send + Sync>>;

    /// Upsert the given counters.
    async fn save_stock(
        &self,
        entries: &[(String, u32)],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
