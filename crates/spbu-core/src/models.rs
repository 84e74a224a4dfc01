//! Domain models for SPBU monitoring.
//!
//! Wire representations use camelCase field names. Input structs carry a
//! [`Validate`] impl that is run both by the client before submission and
//! by the server before persisting.

pub mod adjustment;
pub mod delivery;
pub mod deposit;
pub mod price;
pub mod report;
pub mod sale;
pub mod station;
pub mod tank;
pub mod user;

use crate::error::{SpbuError, SpbuResult};

/// Input validation performed before anything is persisted.
pub trait Validate {
    fn validate(&self) -> SpbuResult<()>;
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> SpbuResult<()> {
    if value.trim().is_empty() {
        return Err(SpbuError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

pub(crate) fn require_positive(field: &str, value: f64) -> SpbuResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SpbuError::validation(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(())
}

pub(crate) fn require_positive_amount(field: &str, value: i64) -> SpbuResult<()> {
    if value <= 0 {
        return Err(SpbuError::validation(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(())
}
