//! The payroll core: generation, approval, access checks and deduction
//! administration.

mod access;
mod approver;
mod deductions;
mod generator;
mod service;

pub use access::{PayslipAccessGuard, Requester};
pub use approver::PayrollApprover;
pub use deductions::{DeductionService, DeductionUpdate, NewDeduction};
pub use generator::PayrollGenerator;
pub use service::PayrollService;
