//! Shared in-memory storage.

use std::collections::BTreeMap;
use std::sync::Arc;

use spbu_core::models::{
    adjustment::Adjustment, delivery::Delivery, deposit::Deposit, price::Price, sale::Sale,
    station::Spbu, tank::Tank, user::UserCredentials,
};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::DbError;

/// Rows of one entity type keyed by a monotonically assigned id.
#[derive(Debug)]
pub struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    /// Insert the row built for the next free id.
    pub fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> &T {
        self.last_id += 1;
        let id = self.last_id;
        self.rows.entry(id).or_insert(build(id))
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    pub fn replace(&mut self, id: i64, row: T) {
        self.rows.insert(id, row);
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Every table in the store.
#[derive(Debug, Default)]
pub struct Tables {
    pub(crate) users: Table<UserCredentials>,
    pub(crate) stations: Table<Spbu>,
    pub(crate) tanks: Table<Tank>,
    pub(crate) prices: Table<Price>,
    pub(crate) sales: Table<Sale>,
    pub(crate) adjustments: Table<Adjustment>,
    pub(crate) deposits: Table<Deposit>,
    pub(crate) deliveries: Table<Delivery>,
}

impl Tables {
    /// Tank `tank_id`, provided it belongs to station `spbu_id`.
    pub(crate) fn tank_in_station(&self, tank_id: i64, spbu_id: i64) -> Result<&Tank, DbError> {
        self.tanks
            .get(tank_id)
            .filter(|t| t.spbu_id == spbu_id)
            .ok_or_else(|| DbError::not_found("tank", tank_id))
    }
}

/// Handle to the shared store. Cloning is cheap; all clones see the same
/// data. Every repository operation takes the lock once, so each one is
/// atomic with respect to the others.
#[derive(Clone, Default)]
pub struct Database {
    inner: Arc<RwLock<Tables>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().await
    }
}
