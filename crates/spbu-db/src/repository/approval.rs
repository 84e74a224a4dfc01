//! In-memory implementation of [`ApprovalRepository`] for every
//! approval-bearing kind.

use std::marker::PhantomData;

use chrono::Utc;
use spbu_core::error::SpbuResult;
use spbu_core::models::Validate;
use spbu_core::models::adjustment::CreateAdjustment;
use spbu_core::models::delivery::CreateDelivery;
use spbu_core::models::user::User;
use spbu_core::repository::{ApprovalFilter, ApprovalRepository};
use spbu_core::workflow::{
    self, Adjustments, Approvable, ApprovalKind, Decision, Deliveries, Deposits,
};
use tracing::info;

use crate::database::{Database, Table, Tables};
use crate::error::DbError;

/// An approval kind with a table in [`Tables`].
pub trait StoredKind: ApprovalKind {
    fn table(tables: &Tables) -> &Table<Self::Entity>;
    fn table_mut(tables: &mut Tables) -> &mut Table<Self::Entity>;

    /// Check that records referenced by `input` exist in `spbu_id`.
    fn check_references(
        _tables: &Tables,
        _spbu_id: i64,
        _input: &Self::Create,
    ) -> Result<(), DbError> {
        Ok(())
    }
}

impl StoredKind for Adjustments {
    fn table(tables: &Tables) -> &Table<Self::Entity> {
        &tables.adjustments
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self::Entity> {
        &mut tables.adjustments
    }

    fn check_references(
        tables: &Tables,
        spbu_id: i64,
        input: &CreateAdjustment,
    ) -> Result<(), DbError> {
        if let Some(tank_id) = input.tank_id {
            tables.tank_in_station(tank_id, spbu_id)?;
        }
        Ok(())
    }
}

impl StoredKind for Deposits {
    fn table(tables: &Tables) -> &Table<Self::Entity> {
        &tables.deposits
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self::Entity> {
        &mut tables.deposits
    }
}

impl StoredKind for Deliveries {
    fn table(tables: &Tables) -> &Table<Self::Entity> {
        &tables.deliveries
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self::Entity> {
        &mut tables.deliveries
    }

    fn check_references(
        tables: &Tables,
        spbu_id: i64,
        input: &CreateDelivery,
    ) -> Result<(), DbError> {
        tables.tank_in_station(input.tank_id, spbu_id)?;
        Ok(())
    }
}

pub struct MemoryApprovalRepository<K> {
    db: Database,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for MemoryApprovalRepository<K> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: StoredKind> MemoryApprovalRepository<K> {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            _kind: PhantomData,
        }
    }
}

impl<K: StoredKind> ApprovalRepository<K> for MemoryApprovalRepository<K> {
    async fn create(
        &self,
        spbu_id: i64,
        operator_id: i64,
        input: K::Create,
    ) -> SpbuResult<K::Entity> {
        input.validate()?;
        let mut tables = self.db.write().await;
        if tables.stations.get(spbu_id).is_none() {
            return Err(DbError::not_found("spbu", spbu_id).into());
        }
        K::check_references(&tables, spbu_id, &input)?;

        let now = Utc::now();
        let entity = K::table_mut(&mut tables)
            .insert_with(|id| K::build(id, spbu_id, operator_id, input, now))
            .clone();
        info!(
            kind = K::NAME,
            id = entity.id(),
            spbu_id,
            operator_id,
            "Approval request created"
        );
        Ok(entity)
    }

    async fn get_by_id(&self, id: i64) -> SpbuResult<K::Entity> {
        let tables = self.db.read().await;
        K::table(&tables)
            .get(id)
            .cloned()
            .ok_or_else(|| DbError::not_found(K::NAME, id).into())
    }

    async fn list(&self, filter: ApprovalFilter) -> SpbuResult<Vec<K::Entity>> {
        let tables = self.db.read().await;
        Ok(K::table(&tables)
            .values()
            .filter(|e| filter.spbu_id.is_none_or(|id| e.spbu_id() == id))
            .filter(|e| filter.status.is_none_or(|s| e.status() == s))
            .cloned()
            .collect())
    }

    async fn decide(&self, id: i64, decision: Decision, actor: &User) -> SpbuResult<K::Entity> {
        let mut tables = self.db.write().await;

        // Work on a copy so a failed stock update leaves the entity pending.
        let mut entity = K::table(&tables)
            .get(id)
            .cloned()
            .ok_or_else(|| DbError::not_found(K::NAME, id))?;
        workflow::decide::<K>(&mut entity, decision, actor, Utc::now())?;

        if decision == Decision::Approve {
            if let Some(effect) = entity.stock_effect() {
                let tank = tables
                    .tanks
                    .get_mut(effect.tank_id)
                    .ok_or_else(|| DbError::not_found("tank", effect.tank_id))?;
                tank.current_stock = tank.stock_after(effect.delta)?;
            }
        }

        K::table_mut(&mut tables).replace(id, entity.clone());
        info!(
            kind = K::NAME,
            id,
            actor_id = actor.id,
            status = %entity.status(),
            "Approval request decided"
        );
        Ok(entity)
    }
}
