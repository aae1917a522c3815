//! Sends one salary notice per approved payslip and records the outcome.

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{NotificationLog, NotificationStatus, Payslip};
use crate::store::{EmployeeStoreRef, EmploymentStoreRef, NotificationLogStoreRef};

use super::events::ApprovalEvent;
use super::message::{MessageSenderRef, PayslipMessage};

/// Counts of what happened to one approval batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Messages the sender accepted.
    pub sent: usize,
    /// Messages the sender rejected; each has a FAILED log row.
    pub failed: usize,
    /// Payslips that could not be processed at all (owner not found,
    /// audit write failed).
    pub errored: usize,
}

/// Consumes approval events and notifies the paid employees.
///
/// Each payslip is handled on its own: a failure for one never stops the
/// rest, and nothing here can affect the approval that produced the event.
pub struct NotificationDispatcher {
    employees: EmployeeStoreRef,
    employments: EmploymentStoreRef,
    sender: MessageSenderRef,
    audit: NotificationLogStoreRef,
    institution_name: String,
}

impl NotificationDispatcher {
    /// Creates a dispatcher.
    pub fn new(
        employees: EmployeeStoreRef,
        employments: EmploymentStoreRef,
        sender: MessageSenderRef,
        audit: NotificationLogStoreRef,
        institution_name: impl Into<String>,
    ) -> Self {
        Self {
            employees,
            employments,
            sender,
            audit,
            institution_name: institution_name.into(),
        }
    }

    /// Runs the dispatcher on a background task until the event channel
    /// closes.
    pub fn spawn(self, mut events: mpsc::UnboundedReceiver<ApprovalEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                self.dispatch(&event).await;
            }
            info!("Approval event channel closed; notification dispatcher stopped");
        })
    }

    /// Notifies the owner of every payslip in the event.
    pub async fn dispatch(&self, event: &ApprovalEvent) -> DispatchSummary {
        info!(
            period = %event.period,
            payslips = event.payslips.len(),
            "Handling payroll approved event"
        );

        let mut summary = DispatchSummary::default();
        for payslip in &event.payslips {
            match self.notify(payslip).await {
                Ok(NotificationStatus::Sent) => summary.sent += 1,
                Ok(NotificationStatus::Failed) => summary.failed += 1,
                Err(err) => {
                    error!(
                        payslip_id = %payslip.id,
                        employment_id = %payslip.employment_id,
                        error = %err,
                        "Could not process payslip notification"
                    );
                    summary.errored += 1;
                }
            }
        }

        info!(
            period = %event.period,
            sent = summary.sent,
            failed = summary.failed,
            errored = summary.errored,
            "Payroll notifications dispatched"
        );
        summary
    }

    async fn notify(&self, payslip: &Payslip) -> PayrollResult<NotificationStatus> {
        let employment = self
            .employments
            .find_employment(payslip.employment_id)
            .await?
            .ok_or_else(|| PayrollError::not_found("Employment", payslip.employment_id))?;
        let employee = self
            .employees
            .find_employee(employment.employee_id)
            .await?
            .ok_or_else(|| PayrollError::not_found("Employee", employment.employee_id))?;

        let message = PayslipMessage::compose(&employee, payslip, &self.institution_name);
        let (status, error_message) = match self
            .sender
            .send(&employee.email, &message.subject, &message.body)
            .await
        {
            Ok(()) => {
                info!(
                    recipient = %employee.email,
                    month = payslip.month,
                    year = payslip.year,
                    "Payslip notification sent"
                );
                (NotificationStatus::Sent, None)
            }
            Err(err) => {
                warn!(
                    recipient = %employee.email,
                    error = %err,
                    "Failed to send payslip notification"
                );
                (NotificationStatus::Failed, Some(err.message))
            }
        };

        self.audit
            .append_notification(NotificationLog {
                id: Uuid::new_v4(),
                employee_id: employee.id,
                recipient_email: employee.email,
                subject: message.subject,
                message: message.body,
                status,
                sent_at: Utc::now(),
                error_message,
            })
            .await?;

        Ok(status)
    }
}
