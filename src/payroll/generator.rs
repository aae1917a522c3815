//! Payslip generation for a payroll period.

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_payslip, RateTable};
use crate::error::PayrollResult;
use crate::models::{Employment, Payslip, PayslipStatus, Period};
use crate::store::{EmploymentStoreRef, PayslipStoreRef, RateStoreRef};

/// Computes and persists the payslips of every ACTIVE employment.
///
/// Regeneration policy per employment:
/// - PAID payslip: left untouched and returned as-is;
/// - PENDING payslip: recomputed and swapped in under the same id;
/// - none: computed and inserted.
///
/// Running generation twice with no data change therefore yields the same
/// ids and amounts.
pub struct PayrollGenerator {
    rates: RateStoreRef,
    employments: EmploymentStoreRef,
    payslips: PayslipStoreRef,
}

impl PayrollGenerator {
    /// Creates a generator over the given stores.
    pub fn new(
        rates: RateStoreRef,
        employments: EmploymentStoreRef,
        payslips: PayslipStoreRef,
    ) -> Self {
        Self {
            rates,
            employments,
            payslips,
        }
    }

    /// Generates payslips for `period`.
    ///
    /// Failing to load the rate table or the employments fails the whole
    /// call. A failure for one employment is logged and that employment is
    /// left out of the result; the others proceed.
    pub async fn generate(&self, period: Period) -> PayrollResult<Vec<Payslip>> {
        let rates = RateTable::from_deductions(&self.rates.list_rates().await?);
        let employments = self.employments.find_active_employments().await?;

        info!(
            period = %period,
            employments = employments.len(),
            rates = rates.len(),
            "Generating payroll"
        );

        let mut generated = Vec::with_capacity(employments.len());
        for employment in &employments {
            match self.generate_one(employment, period, &rates).await {
                Ok(payslip) => generated.push(payslip),
                Err(err) => error!(
                    employment_id = %employment.id,
                    employment_code = %employment.code,
                    period = %period,
                    error = %err,
                    "Payslip generation failed for employment"
                ),
            }
        }

        info!(
            period = %period,
            payslips = generated.len(),
            "Payroll generated"
        );
        Ok(generated)
    }

    async fn generate_one(
        &self,
        employment: &Employment,
        period: Period,
        rates: &RateTable,
    ) -> PayrollResult<Payslip> {
        let existing = self
            .payslips
            .find_payslip_for_employment(employment.id, period)
            .await?;

        if let Some(paid) = existing.as_ref().filter(|p| p.is_paid()) {
            info!(
                employment_id = %employment.id,
                payslip_id = %paid.id,
                "Payslip already paid; skipping"
            );
            return Ok(paid.clone());
        }

        let calculation = calculate_payslip(employment.base_salary, rates);
        for warning in &calculation.warnings {
            warn!(
                employment_id = %employment.id,
                code = %warning.code,
                "{}",
                warning.message
            );
        }

        let stale = existing.map(|p| p.id);
        let fresh = Payslip {
            id: stale.unwrap_or_else(Uuid::new_v4),
            employment_id: employment.id,
            amounts: calculation.amounts,
            month: period.month(),
            year: period.year(),
            status: PayslipStatus::Pending,
            processed_date: Utc::now(),
            payment_date: None,
        };

        let saved = self.payslips.replace_pending_payslip(stale, fresh).await?;
        if stale.is_some() {
            info!(
                employment_id = %employment.id,
                payslip_id = %saved.id,
                net_salary = %saved.amounts.net_salary,
                "Pending payslip regenerated"
            );
        } else {
            info!(
                employment_id = %employment.id,
                payslip_id = %saved.id,
                net_salary = %saved.amounts.net_salary,
                "Payslip created"
            );
        }
        Ok(saved)
    }
}
