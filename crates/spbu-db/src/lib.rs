//! SPBU Database — in-memory storage and repository implementations.
//!
//! This crate provides:
//! - The shared storage handle ([`Database`])
//! - Repository implementations of the `spbu-core` traits ([`repository`])
//! - Demo seed data ([`seed_demo`])
//! - Error types ([`DbError`])

mod database;
mod error;
pub mod repository;
mod seed;

pub use database::{Database, Table, Tables};
pub use error::DbError;
pub use repository::hash_password;
pub use seed::{DEMO_PASSWORD, SeedSummary, seed_demo};
