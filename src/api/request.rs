//! Request types for the payroll API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payroll::{DeductionUpdate, NewDeduction};

/// A payroll period, as a JSON body or a query string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// Month, 1-12.
    pub month: u32,
    /// Four-digit year.
    pub year: i32,
}

/// Request body for creating a deduction rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionRequest {
    /// Unique code, e.g. "EMP_TAX".
    pub code: String,
    /// Unique display name.
    pub name: String,
    /// Fraction of base salary, between 0 and 1.
    pub percentage: Decimal,
}

impl From<DeductionRequest> for NewDeduction {
    fn from(req: DeductionRequest) -> Self {
        NewDeduction {
            code: req.code,
            name: req.name,
            percentage: req.percentage,
        }
    }
}

/// Request body for updating a deduction rate. The code cannot change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionUpdateRequest {
    /// New display name.
    pub name: String,
    /// New fraction of base salary.
    pub percentage: Decimal,
}

impl From<DeductionUpdateRequest> for DeductionUpdate {
    fn from(req: DeductionUpdateRequest) -> Self {
        DeductionUpdate {
            name: req.name,
            percentage: req.percentage,
        }
    }
}
