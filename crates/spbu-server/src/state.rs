//! Shared server state injected into all handlers.

use std::sync::Arc;

use spbu_auth::{AuthConfig, AuthService};
use spbu_core::workflow::{Adjustments, Deliveries, Deposits};
use spbu_db::Database;
use spbu_db::repository::{
    MemoryApprovalRepository, MemoryPriceRepository, MemorySaleRepository,
    MemoryStationRepository, MemoryTankRepository, MemoryUserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<MemoryUserRepository>>,
    pub users: MemoryUserRepository,
    pub stations: MemoryStationRepository,
    pub tanks: MemoryTankRepository,
    pub prices: MemoryPriceRepository,
    pub sales: MemorySaleRepository,
    pub adjustments: MemoryApprovalRepository<Adjustments>,
    pub deposits: MemoryApprovalRepository<Deposits>,
    pub deliveries: MemoryApprovalRepository<Deliveries>,
}

impl AppState {
    pub fn new(db: Database, auth_config: AuthConfig) -> Self {
        let users = match &auth_config.pepper {
            Some(p) => MemoryUserRepository::with_pepper(db.clone(), p.clone()),
            None => MemoryUserRepository::new(db.clone()),
        };
        Self {
            auth: Arc::new(AuthService::new(users.clone(), auth_config)),
            users,
            stations: MemoryStationRepository::new(db.clone()),
            tanks: MemoryTankRepository::new(db.clone()),
            prices: MemoryPriceRepository::new(db.clone()),
            sales: MemorySaleRepository::new(db.clone()),
            adjustments: MemoryApprovalRepository::new(db.clone()),
            deposits: MemoryApprovalRepository::new(db.clone()),
            deliveries: MemoryApprovalRepository::new(db),
        }
    }
}
