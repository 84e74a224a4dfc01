//! In-memory implementation of [`TankRepository`].

use spbu_core::error::SpbuResult;
use spbu_core::models::Validate;
use spbu_core::models::tank::{CreateTank, Tank};
use spbu_core::repository::TankRepository;

use crate::database::Database;
use crate::error::DbError;

#[derive(Clone)]
pub struct MemoryTankRepository {
    db: Database,
}

impl MemoryTankRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl TankRepository for MemoryTankRepository {
    async fn create(&self, spbu_id: i64, input: CreateTank) -> SpbuResult<Tank> {
        input.validate()?;
        let mut tables = self.db.write().await;
        if tables.stations.get(spbu_id).is_none() {
            return Err(DbError::not_found("spbu", spbu_id).into());
        }
        Ok(tables
            .tanks
            .insert_with(|id| Tank {
                id,
                spbu_id,
                name: input.name,
                fuel_type: input.fuel_type,
                capacity: input.capacity,
                current_stock: input.current_stock,
            })
            .clone())
    }

    async fn get_by_id(&self, id: i64) -> SpbuResult<Tank> {
        let tables = self.db.read().await;
        tables
            .tanks
            .get(id)
            .cloned()
            .ok_or_else(|| DbError::not_found("tank", id).into())
    }

    async fn list(&self, spbu_id: Option<i64>) -> SpbuResult<Vec<Tank>> {
        let tables = self.db.read().await;
        Ok(tables
            .tanks
            .values()
            .filter(|t| spbu_id.is_none_or(|id| t.spbu_id == id))
            .cloned()
            .collect())
    }
}
