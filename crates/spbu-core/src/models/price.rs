//! Fuel price domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Validate, require_non_empty, require_positive_amount};
use crate::error::SpbuResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub id: i64,
    pub fuel_type: String,
    /// Price per litre in rupiah.
    pub price: i64,
    /// Station-specific override; `None` applies to every station.
    #[serde(default)]
    pub spbu_id: Option<i64>,
    pub effective_from: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrice {
    pub fuel_type: String,
    pub price: i64,
    #[serde(default)]
    pub spbu_id: Option<i64>,
    /// Defaults to the time of creation.
    #[serde(default)]
    pub effective_from: Option<DateTime<Utc>>,
}

impl Validate for CreatePrice {
    fn validate(&self) -> SpbuResult<()> {
        require_non_empty("fuelType", &self.fuel_type)?;
        require_positive_amount("price", self.price)
    }
}

/// Price in effect for `fuel_type` at `spbu_id` as of `at`. With no
/// station only global prices are considered.
///
/// A station-specific price wins over a global one; among candidates of
/// the same scope the most recent `effective_from` wins.
pub fn current_price<'a>(
    prices: impl IntoIterator<Item = &'a Price>,
    fuel_type: &str,
    spbu_id: Option<i64>,
    at: DateTime<Utc>,
) -> Option<&'a Price> {
    prices
        .into_iter()
        .filter(|p| p.fuel_type.eq_ignore_ascii_case(fuel_type) && p.effective_from <= at)
        .filter(|p| p.spbu_id.is_none() || p.spbu_id == spbu_id)
        .max_by_key(|p| (p.spbu_id.is_some(), p.effective_from))
}
