//! Payslip models.
//!
//! This module contains the persisted [`Payslip`], the computed
//! [`PayslipAmounts`] it carries, and the [`PayslipView`] returned to callers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Employee, Employment, Period};

/// Payslip lifecycle state. PAID is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayslipStatus {
    /// Computed but not yet approved; may be regenerated.
    Pending,
    /// Approved and paid; never recomputed.
    Paid,
}

/// The monetary breakdown of one payslip, every field with two decimals.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayslipAmounts;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amounts = PayslipAmounts {
///     house_amount: Decimal::from_str("140000.00").unwrap(),
///     transport_amount: Decimal::from_str("140000.00").unwrap(),
///     employee_taxed_amount: Decimal::from_str("300000.00").unwrap(),
///     pension_amount: Decimal::from_str("60000.00").unwrap(),
///     medical_insurance_amount: Decimal::from_str("50000.00").unwrap(),
///     other_taxed_amount: Decimal::from_str("50000.00").unwrap(),
///     gross_salary: Decimal::from_str("1280000.00").unwrap(),
///     net_salary: Decimal::from_str("820000.00").unwrap(),
/// };
/// assert_eq!(amounts.total_deductions(), Decimal::from_str("460000.00").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipAmounts {
    /// Housing allowance.
    pub house_amount: Decimal,
    /// Transport allowance.
    pub transport_amount: Decimal,
    /// Employee tax withheld.
    pub employee_taxed_amount: Decimal,
    /// Pension contribution withheld.
    pub pension_amount: Decimal,
    /// Medical insurance withheld.
    pub medical_insurance_amount: Decimal,
    /// Other withholdings.
    pub other_taxed_amount: Decimal,
    /// Base salary plus allowances.
    pub gross_salary: Decimal,
    /// Gross salary minus withholdings, never negative.
    pub net_salary: Decimal,
}

impl PayslipAmounts {
    /// Sum of the four withholdings.
    pub fn total_deductions(&self) -> Decimal {
        self.employee_taxed_amount
            + self.pension_amount
            + self.medical_insurance_amount
            + self.other_taxed_amount
    }
}

/// The persisted salary breakdown for one employment and one period.
///
/// At most one payslip exists per (employment, month, year); the store
/// enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier.
    pub id: Uuid,
    /// The employment this payslip pays.
    pub employment_id: Uuid,
    /// The computed amounts, immutable after creation.
    #[serde(flatten)]
    pub amounts: PayslipAmounts,
    /// Month of the period, 1-12.
    pub month: u32,
    /// Year of the period.
    pub year: i32,
    /// Lifecycle state.
    pub status: PayslipStatus,
    /// When the amounts were computed.
    pub processed_date: DateTime<Utc>,
    /// When the payslip was approved, set only on PAID payslips.
    pub payment_date: Option<DateTime<Utc>>,
}

impl Payslip {
    /// Returns true if the payslip has been approved.
    pub fn is_paid(&self) -> bool {
        self.status == PayslipStatus::Paid
    }

    /// Returns true if the payslip belongs to the given period.
    pub fn is_for(&self, period: Period) -> bool {
        self.month == period.month() && self.year == period.year()
    }
}

/// A payslip joined with its employment and employee, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayslipView {
    /// Payslip id.
    pub id: Uuid,
    /// Employment id.
    pub employment_id: Uuid,
    /// "first last" of the employee.
    pub employee_name: String,
    /// The employee's code.
    pub employee_code: String,
    /// The computed amounts.
    #[serde(flatten)]
    pub amounts: PayslipAmounts,
    /// Month of the period.
    pub month: u32,
    /// Year of the period.
    pub year: i32,
    /// Lifecycle state.
    pub status: PayslipStatus,
    /// When the amounts were computed.
    pub processed_date: DateTime<Utc>,
    /// When the payslip was approved.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payment_date: Option<DateTime<Utc>>,
}

impl PayslipView {
    /// Joins a payslip with the employment and employee it belongs to.
    pub fn new(payslip: &Payslip, employment: &Employment, employee: &Employee) -> Self {
        Self {
            id: payslip.id,
            employment_id: employment.id,
            employee_name: employee.full_name(),
            employee_code: employee.code.clone(),
            amounts: payslip.amounts.clone(),
            month: payslip.month,
            year: payslip.year,
            status: payslip.status,
            processed_date: payslip.processed_date,
            payment_date: payslip.payment_date,
        }
    }
}
