//! SPBU (fuel station) domain model.
//!
//! Stations are the tenant boundary: tanks, sales, deposits, deliveries
//! and adjustments all belong to exactly one station.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Validate, require_non_empty};
use crate::error::SpbuResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Spbu {
    pub id: i64,
    /// Station number as printed on the forecourt (e.g. `34.123.45`).
    pub code: String,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpbu {
    pub code: String,
    pub name: String,
    pub address: String,
}

impl Validate for CreateSpbu {
    fn validate(&self) -> SpbuResult<()> {
        require_non_empty("code", &self.code)?;
        require_non_empty("name", &self.name)?;
        require_non_empty("address", &self.address)
    }
}
