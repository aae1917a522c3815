//! Persistence ports consumed by the payroll core.
//!
//! Each trait is the narrow slice of a storage backend that the core needs.
//! Implementations must enforce the uniqueness rules documented on each
//! method and report violations as [`PayrollError::Conflict`]. Backend faults
//! that have nothing to do with the request (a lost connection, a failed
//! transaction) are reported as [`PayrollError::Storage`]; the in-memory
//! store never raises it.
//!
//! [`PayrollError::Conflict`]: crate::error::PayrollError::Conflict
//! [`PayrollError::Storage`]: crate::error::PayrollError::Storage

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::PayrollResult;
use crate::models::{
    DeductionRate, Employee, Employment, EmploymentStatus, NotificationLog, Payslip,
    PayslipStatus, Period,
};

/// Storage for deduction rates.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Returns every stored rate, ordered by code.
    async fn list_rates(&self) -> PayrollResult<Vec<DeductionRate>>;
    /// Looks up a rate by id.
    async fn find_rate(&self, id: Uuid) -> PayrollResult<Option<DeductionRate>>;
    /// Looks up a rate by its unique code.
    async fn find_rate_by_code(&self, code: &str) -> PayrollResult<Option<DeductionRate>>;
    /// Looks up a rate by its unique name.
    async fn find_rate_by_name(&self, name: &str) -> PayrollResult<Option<DeductionRate>>;
    /// Inserts a rate. Code and name are each unique.
    async fn insert_rate(&self, rate: DeductionRate) -> PayrollResult<DeductionRate>;
    /// Replaces a stored rate. The name stays unique.
    async fn update_rate(&self, rate: DeductionRate) -> PayrollResult<DeductionRate>;
    /// Hard delete.
    async fn delete_rate(&self, id: Uuid) -> PayrollResult<()>;
}

/// Storage for employees.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Looks up an employee by id.
    async fn find_employee(&self, id: Uuid) -> PayrollResult<Option<Employee>>;
    /// Looks up an employee by email.
    async fn find_employee_by_email(&self, email: &str) -> PayrollResult<Option<Employee>>;
    /// Inserts an employee. Code, email and mobile are each unique.
    async fn insert_employee(&self, employee: Employee) -> PayrollResult<Employee>;
}

/// Storage for employments.
#[async_trait]
pub trait EmploymentStore: Send + Sync {
    /// Returns ACTIVE employments only, ordered by code.
    async fn find_active_employments(&self) -> PayrollResult<Vec<Employment>>;
    /// Looks up an employment by id.
    async fn find_employment(&self, id: Uuid) -> PayrollResult<Option<Employment>>;
    /// Looks up an employment by its unique code.
    async fn find_employment_by_code(&self, code: &str) -> PayrollResult<Option<Employment>>;
    /// Returns every employment of an employee regardless of status.
    async fn find_employments_by_employee(&self, employee_id: Uuid)
    -> PayrollResult<Vec<Employment>>;
    /// Inserts an employment. The code is unique.
    async fn insert_employment(&self, employment: Employment) -> PayrollResult<Employment>;
    /// Flips the status; employments are never deleted.
    async fn set_employment_status(
        &self,
        id: Uuid,
        status: EmploymentStatus,
    ) -> PayrollResult<Employment>;
}

/// Storage for payslips.
///
/// At most one payslip may exist per (employment, month, year).
#[async_trait]
pub trait PayslipStore: Send + Sync {
    /// Looks up a payslip by id.
    async fn find_payslip(&self, id: Uuid) -> PayrollResult<Option<Payslip>>;
    /// Looks up the payslip of one employment for a period.
    async fn find_payslip_for_employment(
        &self,
        employment_id: Uuid,
        period: Period,
    ) -> PayrollResult<Option<Payslip>>;
    /// Returns every payslip of a period.
    async fn find_payslips_by_period(&self, period: Period) -> PayrollResult<Vec<Payslip>>;
    /// Returns the payslips of a period in the given state.
    async fn find_payslips_by_period_and_status(
        &self,
        period: Period,
        status: PayslipStatus,
    ) -> PayrollResult<Vec<Payslip>>;
    /// Payslips of any of the given employments, optionally limited to a period.
    async fn find_payslips_by_employments(
        &self,
        employment_ids: &[Uuid],
        period: Option<Period>,
    ) -> PayrollResult<Vec<Payslip>>;
    /// Inserts a payslip, failing with Conflict if its
    /// (employment, month, year) is taken.
    async fn insert_payslip(&self, payslip: Payslip) -> PayrollResult<Payslip>;
    /// Records an approval. Only status and payment date are written; the
    /// amounts of a stored payslip never change. A PAID payslip cannot be
    /// updated again.
    async fn update_payslip(
        &self,
        id: Uuid,
        status: PayslipStatus,
        payment_date: Option<DateTime<Utc>>,
    ) -> PayrollResult<Payslip>;
    /// Marks every payslip in `ids` PAID with `payment_date` as one unit:
    /// either all of them change or none does. Fails with NotFound for an
    /// unknown id and Conflict for a payslip that is no longer PENDING.
    async fn approve_payslips(
        &self,
        ids: &[Uuid],
        payment_date: DateTime<Utc>,
    ) -> PayrollResult<Vec<Payslip>>;
    /// Deletes the `stale` PENDING payslip (when given) and inserts `fresh`
    /// as one unit: either both happen or neither does. Fails with Conflict
    /// if `stale` is no longer PENDING or if `fresh` would break uniqueness.
    async fn replace_pending_payslip(
        &self,
        stale: Option<Uuid>,
        fresh: Payslip,
    ) -> PayrollResult<Payslip>;
}

/// Append-only storage for notification outcomes.
#[async_trait]
pub trait NotificationLogStore: Send + Sync {
    /// Appends one audit row.
    async fn append_notification(&self, entry: NotificationLog) -> PayrollResult<()>;
}

/// Shared handle to a [`RateStore`].
pub type RateStoreRef = Arc<dyn RateStore>;
/// Shared handle to an [`EmployeeStore`].
pub type EmployeeStoreRef = Arc<dyn EmployeeStore>;
/// Shared handle to an [`EmploymentStore`].
pub type EmploymentStoreRef = Arc<dyn EmploymentStore>;
/// Shared handle to a [`PayslipStore`].
pub type PayslipStoreRef = Arc<dyn PayslipStore>;
/// Shared handle to a [`NotificationLogStore`].
pub type NotificationLogStoreRef = Arc<dyn NotificationLogStore>;
