//! In-memory implementation of [`StationRepository`].

use chrono::Utc;
use spbu_core::error::SpbuResult;
use spbu_core::models::Validate;
use spbu_core::models::station::{CreateSpbu, Spbu};
use spbu_core::repository::StationRepository;

use crate::database::Database;
use crate::error::DbError;

#[derive(Clone)]
pub struct MemoryStationRepository {
    db: Database,
}

impl MemoryStationRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl StationRepository for MemoryStationRepository {
    async fn create(&self, input: CreateSpbu) -> SpbuResult<Spbu> {
        input.validate()?;
        let mut tables = self.db.write().await;
        if tables.stations.values().any(|s| s.code == input.code) {
            return Err(DbError::Duplicate {
                entity: "spbu".into(),
                key: input.code,
            }
            .into());
        }
        Ok(tables
            .stations
            .insert_with(|id| Spbu {
                id,
                code: input.code,
                name: input.name,
                address: input.address,
                created_at: Utc::now(),
            })
            .clone())
    }

    async fn get_by_id(&self, id: i64) -> SpbuResult<Spbu> {
        let tables = self.db.read().await;
        tables
            .stations
            .get(id)
            .cloned()
            .ok_or_else(|| DbError::not_found("spbu", id).into())
    }

    async fn list(&self, spbu_id: Option<i64>) -> SpbuResult<Vec<Spbu>> {
        let tables = self.db.read().await;
        Ok(tables
            .stations
            .values()
            .filter(|s| spbu_id.is_none_or(|id| s.id == id))
            .cloned()
            .collect())
    }
}
