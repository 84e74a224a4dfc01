//! Adjustment domain model.
//!
//! An adjustment is a manual correction to a ledger value, most commonly
//! a tank's stock after a dip reading. It takes effect only once approved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Validate, require_non_empty, require_positive};
use crate::error::{SpbuError, SpbuResult};
use crate::workflow::{Approvable, Approval, StockEffect};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentTarget {
    /// Corrects the stock of a tank.
    Fuel,
    /// Any other ledger correction; has no stock effect.
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentType {
    Gain,
    Loss,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub id: i64,
    pub spbu_id: i64,
    #[serde(rename = "type")]
    pub target: AdjustmentTarget,
    #[serde(default)]
    pub tank_id: Option<i64>,
    pub adjustment_type: AdjustmentType,
    pub quantity: f64,
    pub description: String,
    #[serde(flatten)]
    pub approval: Approval,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdjustment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spbu_id: Option<i64>,
    #[serde(rename = "type")]
    pub target: AdjustmentTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_id: Option<i64>,
    pub adjustment_type: AdjustmentType,
    pub quantity: f64,
    pub description: String,
}

impl Validate for CreateAdjustment {
    fn validate(&self) -> SpbuResult<()> {
        require_positive("quantity", self.quantity)?;
        require_non_empty("description", &self.description)?;
        if self.target == AdjustmentTarget::Fuel && self.tank_id.is_none() {
            return Err(SpbuError::validation("tankId is required for fuel adjustments"));
        }
        Ok(())
    }
}

impl Approvable for Adjustment {
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
        let tank_id = match self.target {
            AdjustmentTarget::Fuel => self.tank_id?,
            AdjustmentTarget::Other => return None,
        };
        let delta = match self.adjustment_type {
            AdjustmentType::Gain => self.quantity,
            AdjustmentType::Loss => -self.quantity,
        };
        Some(StockEffect { tank_id, delta })
    }
}
