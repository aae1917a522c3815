//! Deduction rate model and the well-known rate codes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named percentage of base salary, used either as an allowance
/// (housing, transport) or a withholding (tax, pension, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionRate {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique code, e.g. "EMP_TAX". Immutable once created.
    pub code: String,
    /// Unique human-readable name.
    pub name: String,
    /// Fraction of base salary, between 0 and 1.
    pub percentage: Decimal,
    /// When the rate was created.
    pub created_at: DateTime<Utc>,
    /// When the rate was last modified.
    pub updated_at: DateTime<Utc>,
}

/// The rate codes the payslip calculator reads.
///
/// Each code carries the fallback percentage used when the rate table has
/// no entry for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeductionCode {
    /// Employee income tax.
    EmployeeTax,
    /// Pension contribution.
    Pension,
    /// Medical insurance contribution.
    MedicalInsurance,
    /// Other withholdings.
    Others,
    /// Housing allowance.
    Housing,
    /// Transport allowance.
    Transport,
}

impl DeductionCode {
    /// All codes in seeding order.
    pub const ALL: [DeductionCode; 6] = [
        DeductionCode::EmployeeTax,
        DeductionCode::Pension,
        DeductionCode::MedicalInsurance,
        DeductionCode::Others,
        DeductionCode::Housing,
        DeductionCode::Transport,
    ];

    /// The code as stored in the rate table.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeductionCode::EmployeeTax => "EMP_TAX",
            DeductionCode::Pension => "PENSION",
            DeductionCode::MedicalInsurance => "MEDICAL_INSURANCE",
            DeductionCode::Others => "OTHERS",
            DeductionCode::Housing => "HOUSING",
            DeductionCode::Transport => "TRANSPORT",
        }
    }

    /// The fallback percentage applied when the code is absent.
    pub fn default_rate(&self) -> Decimal {
        match self {
            DeductionCode::EmployeeTax => Decimal::new(30, 2),
            DeductionCode::Pension => Decimal::new(6, 2),
            DeductionCode::MedicalInsurance => Decimal::new(5, 2),
            DeductionCode::Others => Decimal::new(5, 2),
            DeductionCode::Housing => Decimal::new(14, 2),
            DeductionCode::Transport => Decimal::new(14, 2),
        }
    }
}
