//! Aggregated reporting views.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::deposit::Deposit;
use super::sale::Sale;
use super::tank::Tank;
use crate::workflow::{Approvable, ApprovalStatus};

/// Per-fuel sales totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FuelSalesTotal {
    pub fuel_type: String,
    pub volume: f64,
    pub amount: i64,
    pub transactions: u64,
}

/// Stock snapshot of a single tank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TankLevel {
    pub tank_id: i64,
    pub name: String,
    pub fuel_type: String,
    pub current_stock: f64,
    pub capacity: f64,
    pub fill_ratio: f64,
}

/// Summary returned by `GET /api/reports/summary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Station the summary is scoped to; `None` when it covers all stations.
    pub spbu_id: Option<i64>,
    pub sales: Vec<FuelSalesTotal>,
    pub total_sales_amount: i64,
    pub approved_deposit_amount: i64,
    pub pending_adjustments: u64,
    pub pending_deposits: u64,
    pub pending_deliveries: u64,
    pub tanks: Vec<TankLevel>,
}

/// Counts of requests still awaiting a decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingCounts {
    pub adjustments: u64,
    pub deposits: u64,
    pub deliveries: u64,
}

impl ReportSummary {
    /// Aggregate already station-filtered records. Only approved deposits
    /// count towards the deposited amount.
    pub fn build(
        spbu_id: Option<i64>,
        sales: &[Sale],
        deposits: &[Deposit],
        pending: PendingCounts,
        tanks: &[Tank],
    ) -> Self {
        let mut by_fuel: BTreeMap<&str, FuelSalesTotal> = BTreeMap::new();
        for sale in sales {
            let total = by_fuel
                .entry(sale.fuel_type.as_str())
                .or_insert_with(|| FuelSalesTotal {
                    fuel_type: sale.fuel_type.clone(),
                    ..Default::default()
                });
            total.volume += sale.volume;
            total.amount += sale.amount;
            total.transactions += 1;
        }

        Self {
            spbu_id,
            total_sales_amount: sales.iter().map(|s| s.amount).sum(),
            sales: by_fuel.into_values().collect(),
            approved_deposit_amount: deposits
                .iter()
                .filter(|d| d.status() == ApprovalStatus::Approved)
                .map(|d| d.amount)
                .sum(),
            pending_adjustments: pending.adjustments,
            pending_deposits: pending.deposits,
            pending_deliveries: pending.deliveries,
            tanks: tanks
                .iter()
                .map(|t| TankLevel {
                    tank_id: t.id,
                    name: t.name.clone(),
                    fuel_type: t.fuel_type.clone(),
                    current_stock: t.current_stock,
                    capacity: t.capacity,
                    fill_ratio: t.fill_ratio(),
                })
                .collect(),
        }
    }
}
