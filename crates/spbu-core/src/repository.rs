//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Station-scoped list operations
//! take an optional `spbu_id` filter; `None` means every station.

use crate::error::SpbuResult;
use crate::models::{
    price::{CreatePrice, Price},
    sale::{CreateSale, Sale},
    station::{CreateSpbu, Spbu},
    tank::{CreateTank, Tank},
    user::{CreateUser, User, UserCredentials},
};
use crate::workflow::{ApprovalKind, ApprovalStatus, Decision};

/// Query filters for approval-bearing entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApprovalFilter {
    pub spbu_id: Option<i64>,
    pub status: Option<ApprovalStatus>,
}

impl ApprovalFilter {
    pub fn pending_in(spbu_id: Option<i64>) -> Self {
        Self {
            spbu_id,
            status: Some(ApprovalStatus::Pending),
        }
    }
}

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = SpbuResult<User>> + Send;
    fn get_by_id(&self, id: i64) -> impl Future<Output = SpbuResult<User>> + Send;
    fn get_credentials(
        &self,
        username: &str,
    ) -> impl Future<Output = SpbuResult<UserCredentials>> + Send;
    fn list(&self, spbu_id: Option<i64>) -> impl Future<Output = SpbuResult<Vec<User>>> + Send;
}

pub trait StationRepository: Send + Sync {
    fn create(&self, input: CreateSpbu) -> impl Future<Output = SpbuResult<Spbu>> + Send;
    fn get_by_id(&self, id: i64) -> impl Future<Output = SpbuResult<Spbu>> + Send;
    fn list(&self, spbu_id: Option<i64>) -> impl Future<Output = SpbuResult<Vec<Spbu>>> + Send;
}

pub trait TankRepository: Send + Sync {
    fn create(
        &self,
        spbu_id: i64,
        input: CreateTank,
    ) -> impl Future<Output = SpbuResult<Tank>> + Send;
    fn get_by_id(&self, id: i64) -> impl Future<Output = SpbuResult<Tank>> + Send;
    fn list(&self, spbu_id: Option<i64>) -> impl Future<Output = SpbuResult<Vec<Tank>>> + Send;
}

pub trait PriceRepository: Send + Sync {
    fn create(&self, input: CreatePrice) -> impl Future<Output = SpbuResult<Price>> + Send;
    /// Prices visible to a station: its own overrides plus global prices.
    fn list(&self, spbu_id: Option<i64>) -> impl Future<Output = SpbuResult<Vec<Price>>> + Send;
}

pub trait SaleRepository: Send + Sync {
    /// Record a sale at the current price and draw down the tank stock,
    /// atomically.
    fn record(
        &self,
        spbu_id: i64,
        operator_id: i64,
        input: CreateSale,
    ) -> impl Future<Output = SpbuResult<Sale>> + Send;
    fn list(&self, spbu_id: Option<i64>) -> impl Future<Output = SpbuResult<Vec<Sale>>> + Send;
}

/// Storage for one approval-bearing entity kind.
pub trait ApprovalRepository<K: ApprovalKind>: Send + Sync {
    fn create(
        &self,
        spbu_id: i64,
        operator_id: i64,
        input: K::Create,
    ) -> impl Future<Output = SpbuResult<K::Entity>> + Send;
    fn get_by_id(&self, id: i64) -> impl Future<Output = SpbuResult<K::Entity>> + Send;
    fn list(
        &self,
        filter: ApprovalFilter,
    ) -> impl Future<Output = SpbuResult<Vec<K::Entity>>> + Send;
    /// Authorize `actor`, transition the entity out of pending and apply
    /// its stock effect, all-or-nothing.
    fn decide(
        &self,
        id: i64,
        decision: Decision,
        actor: &User,
    ) -> impl Future<Output = SpbuResult<K::Entity>> + Send;
}
