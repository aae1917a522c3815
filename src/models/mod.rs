//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod deduction;
mod employee;
mod employment;
mod notification;
mod payslip;
mod period;

pub use deduction::{DeductionCode, DeductionRate};
pub use employee::{Employee, EmployeeStatus, Role};
pub use employment::{Employment, EmploymentStatus};
pub use notification::{NotificationLog, NotificationStatus};
pub use payslip::{Payslip, PayslipAmounts, PayslipStatus, PayslipView};
pub use period::Period;
