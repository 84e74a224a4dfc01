//! In-memory implementation of [`SaleRepository`].

use chrono::Utc;
use spbu_core::error::{SpbuError, SpbuResult};
use spbu_core::models::Validate;
use spbu_core::models::price::current_price;
use spbu_core::models::sale::{CreateSale, Sale, sale_amount};
use spbu_core::repository::SaleRepository;

use crate::database::Database;

#[derive(Clone)]
pub struct MemorySaleRepository {
    db: Database,
}

impl MemorySaleRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl SaleRepository for MemorySaleRepository {
    async fn record(&self, spbu_id: i64, operator_id: i64, input: CreateSale) -> SpbuResult<Sale> {
        input.validate()?;
        let now = Utc::now();
        let mut tables = self.db.write().await;

        let tank = tables.tank_in_station(input.tank_id, spbu_id)?;
        let remaining = tank.stock_after(-input.volume)?;
        let fuel_type = tank.fuel_type.clone();
        let unit_price = current_price(tables.prices.values(), &fuel_type, Some(spbu_id), now)
            .map(|p| p.price)
            .ok_or_else(|| SpbuError::validation(format!("no price set for {fuel_type}")))?;

        if let Some(tank) = tables.tanks.get_mut(input.tank_id) {
            tank.current_stock = remaining;
        }
        Ok(tables
            .sales
            .insert_with(|id| Sale {
                id,
                spbu_id,
                tank_id: input.tank_id,
                fuel_type,
                volume: input.volume,
                unit_price,
                amount: sale_amount(input.volume, unit_price),
                operator_id,
                created_at: now,
            })
            .clone())
    }

    async fn list(&self, spbu_id: Option<i64>) -> SpbuResult<Vec<Sale>> {
        let tables = self.db.read().await;
        Ok(tables
            .sales
            .values()
            .filter(|s| spbu_id.is_none_or(|id| s.spbu_id == id))
            .cloned()
            .collect())
    }
}
