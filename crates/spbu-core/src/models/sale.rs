//! Sale domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Validate, require_positive};
use crate::error::SpbuResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub spbu_id: i64,
    pub tank_id: i64,
    pub fuel_type: String,
    /// Litres dispensed.
    pub volume: f64,
    /// Price per litre in rupiah at the time of sale.
    pub unit_price: i64,
    /// Total in rupiah, rounded to the nearest rupiah.
    pub amount: i64,
    pub operator_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSale {
    /// Required for Super Admin; other users sell from their own station.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spbu_id: Option<i64>,
    pub tank_id: i64,
    pub volume: f64,
}

impl Validate for CreateSale {
    fn validate(&self) -> SpbuResult<()> {
        require_positive("volume", self.volume)
    }
}

pub fn sale_amount(volume: f64, unit_price: i64) -> i64 {
    (volume * unit_price as f64).round() as i64
}
