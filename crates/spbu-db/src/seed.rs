//! Demo data: one station, five tanks, global prices and one user per
//! role.

use spbu_core::error::SpbuResult;
use spbu_core::models::price::CreatePrice;
use spbu_core::models::station::CreateSpbu;
use spbu_core::models::tank::CreateTank;
use spbu_core::models::user::CreateUser;
use spbu_core::permission::Role;
use spbu_core::repository::{PriceRepository, StationRepository, TankRepository, UserRepository};
use tracing::info;

use crate::database::Database;
use crate::repository::{
    MemoryPriceRepository, MemoryStationRepository, MemoryTankRepository, MemoryUserRepository,
};

/// Password of every seeded user.
pub const DEMO_PASSWORD: &str = "spbu-demo-password";

const TANKS: [(&str, &str, f64, f64); 5] = [
    ("Tank 1", "Pertalite", 20_000.0, 12_000.0),
    ("Tank 2", "Pertamax", 15_000.0, 8_000.0),
    ("Tank 3", "Pertamax Turbo", 10_000.0, 3_500.0),
    ("Tank 4", "Solar", 20_000.0, 9_000.0),
    ("Tank 5", "Dexlite", 10_000.0, 4_000.0),
];

const PRICES: [(&str, i64); 5] = [
    ("Pertalite", 10_000),
    ("Pertamax", 12_500),
    ("Pertamax Turbo", 14_000),
    ("Solar", 6_800),
    ("Dexlite", 13_400),
];

/// Ids of the seeded records.
#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub spbu_id: i64,
    pub tank_ids: Vec<i64>,
    pub operator_id: i64,
    pub admin_id: i64,
    pub super_admin_id: i64,
}

/// Populate `db` with demo data. `pepper` must match the one used to
/// verify passwords at login.
pub async fn seed_demo(db: &Database, pepper: Option<&str>) -> SpbuResult<SeedSummary> {
    let stations = MemoryStationRepository::new(db.clone());
    let tanks = MemoryTankRepository::new(db.clone());
    let prices = MemoryPriceRepository::new(db.clone());
    let users = match pepper {
        Some(p) => MemoryUserRepository::with_pepper(db.clone(), p.to_string()),
        None => MemoryUserRepository::new(db.clone()),
    };

    let spbu = stations
        .create(CreateSpbu {
            code: "34.401.01".into(),
            name: "SPBU Demo".into(),
            address: "Jl. Merdeka No. 1".into(),
        })
        .await?;

    let mut tank_ids = Vec::with_capacity(TANKS.len());
    for (name, fuel_type, capacity, stock) in TANKS {
        let tank = tanks
            .create(
                spbu.id,
                CreateTank {
                    spbu_id: Some(spbu.id),
                    name: name.into(),
                    fuel_type: fuel_type.into(),
                    capacity,
                    current_stock: stock,
                },
            )
            .await?;
        tank_ids.push(tank.id);
    }

    for (fuel_type, price) in PRICES {
        prices
            .create(CreatePrice {
                fuel_type: fuel_type.into(),
                price,
                spbu_id: None,
                effective_from: None,
            })
            .await?;
    }

    let mut ids = Vec::with_capacity(Role::ALL.len());
    for (username, name, role, spbu_id) in [
        ("operator", "Demo Operator", Role::Operator, Some(spbu.id)),
        ("admin", "Demo Admin", Role::Admin, Some(spbu.id)),
        ("superadmin", "Demo Super Admin", Role::SuperAdmin, None),
    ] {
        let user = users
            .create(CreateUser {
                username: username.into(),
                name: name.into(),
                password: DEMO_PASSWORD.into(),
                roles: vec![role.as_str().into()],
                spbu_id,
            })
            .await?;
        ids.push(user.id);
    }

    info!(spbu_id = spbu.id, tanks = tank_ids.len(), "Seeded demo data");

    Ok(SeedSummary {
        spbu_id: spbu.id,
        tank_ids,
        operator_id: ids[0],
        admin_id: ids[1],
        super_admin_id: ids[2],
    })
}
