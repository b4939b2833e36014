use async_trait::async_trait;
use pizzeria_core::InventoryRepository;
use sqlx::PgPool;

pub struct PgInventoryRepository {
    pool: PgPool,
}

impl PgInventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct StockRow {
    ingredient: String,
    quantity: i32,
}

#[async_trait]
impl InventoryRepository for PgInventoryRepository {
    async fn load_stock(
        &self,
    ) -> Result<Vec<(String, u32)>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, StockRow>(
            "SELECT ingredient, quantity FROM inventory ORDER BY ingredient",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stock = Vec::with_capacity(rows.len());
        for row in rows {
            let quantity = u32::try_from(row.quantity).map_err(|_| {
                format!("Negative stock stored for '{}': {}", row.ingredient, row.quantity)
            })?;
            stock.push((row.ingredient, quantity));
        }
        Ok(stock)
    }

    async fn save_stock(
        &self,
        entries: &[(String, u32)],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut tx = self.pool.begin().await?;

        for (ingredient, quantity) in entries {
            let quantity = i32::try_from(*quantity)?;
            sqlx::query(
                r#"
                INSERT INTO inventory (ingredient, quantity, updated_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (ingredient)
                DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = NOW()
                "#,
            )
            .bind(ingredient)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
