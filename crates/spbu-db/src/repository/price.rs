//! In-memory implementation of [`PriceRepository`].

use chrono::Utc;
use spbu_core::error::SpbuResult;
use spbu_core::models::Validate;
use spbu_core::models::price::{CreatePrice, Price};
use spbu_core::repository::PriceRepository;
use tracing::info;

use crate::database::Database;
use crate::error::DbError;

#[derive(Clone)]
pub struct MemoryPriceRepository {
    db: Database,
}

impl MemoryPriceRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl PriceRepository for MemoryPriceRepository {
    async fn create(&self, input: CreatePrice) -> SpbuResult<Price> {
        input.validate()?;
        let mut tables = self.db.write().await;
        if let Some(spbu_id) = input.spbu_id {
            if tables.stations.get(spbu_id).is_none() {
                return Err(DbError::not_found("spbu", spbu_id).into());
            }
        }
        let price = tables
            .prices
            .insert_with(|id| Price {
                id,
                fuel_type: input.fuel_type,
                price: input.price,
                spbu_id: input.spbu_id,
                effective_from: input.effective_from.unwrap_or_else(Utc::now),
            })
            .clone();
        info!(
            fuel_type = %price.fuel_type,
            price = price.price,
            spbu_id = ?price.spbu_id,
            "Price set"
        );
        Ok(price)
    }

    async fn list(&self, spbu_id: Option<i64>) -> SpbuResult<Vec<Price>> {
        let tables = self.db.read().await;
        Ok(tables
            .prices
            .values()
            .filter(|p| spbu_id.is_none() || p.spbu_id.is_none() || p.spbu_id == spbu_id)
            .cloned()
            .collect())
    }
}
