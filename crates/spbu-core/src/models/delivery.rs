//! Delivery domain model: a fuel drop from a supplier truck into a tank.
//!
//! The stock only changes once the delivery is confirmed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Validate, require_non_empty, require_positive};
use crate::error::SpbuResult;
use crate::workflow::{Approvable, Approval, StockEffect};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: i64,
    pub spbu_id: i64,
    pub tank_id: i64,
    pub supplier: String,
    /// Litres received.
    pub volume: f64,
    pub delivery_order_number: String,
    #[serde(flatten)]
    pub approval: Approval,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDelivery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spbu_id: Option<i64>,
    pub tank_id: i64,
    pub supplier: String,
    pub volume: f64,
    pub delivery_order_number: String,
}

impl Validate for CreateDelivery {
    fn validate(&self) -> SpbuResult<()> {
        require_non_empty("supplier", &self.supplier)?;
        require_non_empty("deliveryOrderNumber", &self.delivery_order_number)?;
        require_positive("volume", self.volume)
    }
}

impl Approvable for Delivery {
    fn id(&self) -> i64 {
        self.id
    }

    fn spbu_id(&self) -> i64 {
        self.spbu_id
    }

    fn approval(&self) -> &Approval {
        &self.approval
    }

    fn approval_mut(&mut self) -> &mut Approval {
        &mut self.approval
    }

    fn stock_effect(&self) -> Option<StockEffect> {
        Some(StockEffect {
            tank_id: self.tank_id,
            delta: self.volume,
        })
    }
}
