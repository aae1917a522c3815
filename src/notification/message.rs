//! Payslip notification messages and the port used to deliver them.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::models::{Employee, Payslip};

/// A delivery failure reported by a [`MessageSender`].
///
/// Failures are recorded in the notification log and never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Message delivery failed: {message}")]
pub struct SendError {
    /// Detail reported by the transport.
    pub message: String,
}

impl SendError {
    /// Creates a send error with the given detail.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Delivers one message to one recipient.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Sends `body_html` with `subject` to `to`.
    async fn send(&self, to: &str, subject: &str, body_html: &str) -> Result<(), SendError>;
}

/// Shared handle to a [`MessageSender`].
pub type MessageSenderRef = Arc<dyn MessageSender>;

/// A [`MessageSender`] that writes every message to the log instead of a
/// mail server.
#[derive(Debug, Clone)]
pub struct TracingMessageSender {
    from: String,
}

impl TracingMessageSender {
    /// Creates a sender that logs messages as coming from `from`.
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl MessageSender for TracingMessageSender {
    async fn send(&self, to: &str, subject: &str, body_html: &str) -> Result<(), SendError> {
        info!(
            from = %self.from,
            to = %to,
            subject = %subject,
            body = %body_html,
            "Delivering message"
        );
        Ok(())
    }
}

/// The salary-credited notice for one payslip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayslipMessage {
    /// Message subject.
    pub subject: String,
    /// Message body.
    pub body: String,
}

impl PayslipMessage {
    /// Fills the fixed template for an approved payslip.
    ///
    /// # Example
    ///
    /// ```
    /// # use payroll_engine::models::*;
    /// # use payroll_engine::notification::PayslipMessage;
    /// # use chrono::{NaiveDate, Utc};
    /// # use rust_decimal::Decimal;
    /// # use uuid::Uuid;
    /// # let employee = Employee {
    /// #     id: Uuid::new_v4(),
    /// #     code: "EMP-12345".to_string(),
    /// #     first_name: "John".to_string(),
    /// #     last_name: "Doe".to_string(),
    /// #     email: "john.doe@example.com".to_string(),
    /// #     mobile: "0788000001".to_string(),
    /// #     date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
    /// #     roles: vec![Role::Employee],
    /// #     status: EmployeeStatus::Active,
    /// # };
    /// # let zero = Decimal::new(0, 2);
    /// # let payslip = Payslip {
    /// #     id: Uuid::new_v4(),
    /// #     employment_id: Uuid::new_v4(),
    /// #     amounts: PayslipAmounts {
    /// #         house_amount: zero, transport_amount: zero,
    /// #         employee_taxed_amount: zero, pension_amount: zero,
    /// #         medical_insurance_amount: zero, other_taxed_amount: zero,
    /// #         gross_salary: zero, net_salary: Decimal::new(82000000, 2),
    /// #     },
    /// #     month: 5,
    /// #     year: 2025,
    /// #     status: PayslipStatus::Paid,
    /// #     processed_date: Utc::now(),
    /// #     payment_date: Some(Utc::now()),
    /// # };
    /// let message = PayslipMessage::compose(&employee, &payslip, "Government of Rwanda");
    /// assert_eq!(message.subject, "Salary Credited - May/2025");
    /// assert!(message.body.starts_with("Dear John, your salary of May/2025"));
    /// ```
    pub fn compose(employee: &Employee, payslip: &Payslip, institution: &str) -> Self {
        let month_name = chrono::Month::try_from(payslip.month as u8)
            .map(|m| m.name())
            .unwrap_or("Unknown");

        let subject = format!("Salary Credited - {}/{}", month_name, payslip.year);
        let body = format!(
            "Dear {}, your salary of {}/{} from {} {} has been credited to your {} account successfully.",
            employee.first_name,
            month_name,
            payslip.year,
            institution,
            payslip.amounts.net_salary,
            employee.code
        );

        Self { subject, body }
    }
}
