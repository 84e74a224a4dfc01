//! In-memory implementations of the `spbu-core` repository traits.

mod approval;
mod price;
mod sale;
mod station;
mod tank;
mod user;

pub use approval::{MemoryApprovalRepository, StoredKind};
pub use price::MemoryPriceRepository;
pub use sale::MemorySaleRepository;
pub use station::MemoryStationRepository;
pub use tank::MemoryTankRepository;
pub use user::{MemoryUserRepository, hash_password};
