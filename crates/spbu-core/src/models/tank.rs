//! Tank domain model.

use serde::{Deserialize, Serialize};

use super::{Validate, require_non_empty, require_positive};
use crate::error::{SpbuError, SpbuResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tank {
    pub id: i64,
    pub spbu_id: i64,
    pub name: String,
    /// Product stored in the tank (e.g. `Pertalite`, `Solar`).
    pub fuel_type: String,
    /// Capacity in litres.
    pub capacity: f64,
    /// Current stock in litres, always within `0..=capacity`.
    pub current_stock: f64,
}

impl Tank {
    /// Stock after applying `delta`, or a validation error if it would
    /// leave the tank's physical bounds.
    pub fn stock_after(&self, delta: f64) -> SpbuResult<f64> {
        let next = self.current_stock + delta;
        if next < 0.0 {
            return Err(SpbuError::validation(format!(
                "insufficient stock in tank {}: {:.2} L available",
                self.name, self.current_stock
            )));
        }
        if next > self.capacity {
            return Err(SpbuError::validation(format!(
                "tank {} capacity of {:.2} L would be exceeded",
                self.name, self.capacity
            )));
        }
        Ok(next)
    }

    pub fn fill_ratio(&self) -> f64 {
        if self.capacity <= 0.0 {
            0.0
        } else {
            self.current_stock / self.capacity
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTank {
    /// Required for Super Admin; other users create in their own station.
    #[serde(default)]
    pub spbu_id: Option<i64>,
    pub name: String,
    pub fuel_type: String,
    pub capacity: f64,
    #[serde(default)]
    pub current_stock: f64,
}

impl Validate for CreateTank {
    fn validate(&self) -> SpbuResult<()> {
        require_non_empty("name", &self.name)?;
        require_non_empty("fuelType", &self.fuel_type)?;
        require_positive("capacity", self.capacity)?;
        if self.current_stock < 0.0 || self.current_stock > self.capacity {
            return Err(SpbuError::validation(
                "currentStock must be between 0 and capacity",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank(stock: f64) -> Tank {
        Tank {
            id: 1,
            spbu_id: 1,
            name: "T1".into(),
            fuel_type: "Pertalite".into(),
            capacity: 1000.0,
            current_stock: stock,
        }
    }

    #[test]
    fn stock_stays_within_bounds() {
        assert_eq!(tank(500.0).stock_after(250.0).unwrap(), 750.0);
        assert_eq!(tank(500.0).stock_after(-500.0).unwrap(), 0.0);
        assert!(tank(500.0).stock_after(-500.1).is_err());
        assert!(tank(500.0).stock_after(501.0).is_err());
    }

    #[test]
    fn create_rejects_overfilled_tank() {
        let input = CreateTank {
            spbu_id: None,
            name: "T2".into(),
            fuel_type: "Solar".into(),
            capacity: 100.0,
            current_stock: 150.0,
        };
        assert!(input.validate().is_err());
    }
}
