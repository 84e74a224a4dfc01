//! Deposit domain model: cash handed over to the bank by a station.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Validate, require_positive_amount};
use crate::error::SpbuResult;
use crate::workflow::{Approvable, Approval};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DepositMethod {
    Cash,
    Transfer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: i64,
    pub spbu_id: i64,
    /// Amount in rupiah.
    pub amount: i64,
    pub method: DepositMethod,
    pub deposit_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub approval: Approval,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeposit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spbu_id: Option<i64>,
    pub amount: i64,
    pub method: DepositMethod,
    pub deposit_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for CreateDeposit {
    fn validate(&self) -> SpbuResult<()> {
        require_positive_amount("amount", self.amount)
    }
}

impl Approvable for Deposit {
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
}
