//! Approval of a period's pending payslips.

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::PayrollResult;
use crate::models::{Payslip, PayslipStatus, Period};
use crate::notification::{ApprovalEvent, EventBusRef};
use crate::store::PayslipStoreRef;

/// Moves PENDING payslips to PAID and announces the batch.
pub struct PayrollApprover {
    payslips: PayslipStoreRef,
    events: EventBusRef,
}

impl PayrollApprover {
    /// Creates an approver that publishes on `events`.
    pub fn new(payslips: PayslipStoreRef, events: EventBusRef) -> Self {
        Self { payslips, events }
    }

    /// Approves every PENDING payslip of `period`.
    ///
    /// All payslips in the batch share one payment date and are stored as
    /// one unit, so a failure leaves every one of them PENDING. The approval
    /// event is published only after the batch has been stored; an empty
    /// selection publishes nothing. A failed publish is logged without
    /// undoing the approval.
    pub async fn approve(&self, period: Period) -> PayrollResult<Vec<Payslip>> {
        let pending = self
            .payslips
            .find_payslips_by_period_and_status(period, PayslipStatus::Pending)
            .await?;

        if pending.is_empty() {
            info!(period = %period, "No pending payslips to approve");
            return Ok(Vec::new());
        }

        let payment_date = Utc::now();
        let ids: Vec<Uuid> = pending.iter().map(|p| p.id).collect();
        let approved = self
            .payslips
            .approve_payslips(&ids, payment_date)
            .await
            .inspect_err(|err| {
                error!(period = %period, error = %err, "Approval rolled back");
            })?;

        info!(
            period = %period,
            approved = approved.len(),
            payment_date = %payment_date,
            "Payroll approved"
        );

        let event = ApprovalEvent {
            period,
            payslips: approved.clone(),
        };
        if let Err(err) = self.events.publish(event) {
            error!(
                period = %period,
                error = %err,
                "Approval committed but notifications were not queued"
            );
        }

        Ok(approved)
    }
}
