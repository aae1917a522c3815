//! Calculation logic for the payroll engine.
//!
//! This module contains the rate table lookup and the payslip calculator
//! that turns a base salary into allowances, withholdings, gross and net
//! salary.

mod payslip;
mod rate_table;

pub use payslip::{
    CalculationWarning, NEGATIVE_NET_SALARY_WARNING, PayslipCalculation, calculate_payslip,
    round_money,
};
pub use rate_table::RateTable;
