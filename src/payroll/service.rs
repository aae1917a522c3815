//! The payroll operations exposed to callers.

use std::collections::HashMap;

use tracing::error;
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Employee, Employment, Payslip, PayslipStatus, PayslipView, Period};
use crate::notification::EventBusRef;
use crate::store::{EmployeeStoreRef, EmploymentStoreRef, PayslipStoreRef, RateStoreRef};

use super::access::{PayslipAccessGuard, Requester};
use super::approver::PayrollApprover;
use super::generator::PayrollGenerator;

/// Facade over generation, approval and payslip queries.
///
/// Every operation returns [`PayslipView`]s, i.e. payslips joined with the
/// employee they pay.
pub struct PayrollService {
    generator: PayrollGenerator,
    approver: PayrollApprover,
    guard: PayslipAccessGuard,
    employees: EmployeeStoreRef,
    employments: EmploymentStoreRef,
    payslips: PayslipStoreRef,
}

impl PayrollService {
    /// Wires the service over the given stores and event bus.
    pub fn new(
        rates: RateStoreRef,
        employees: EmployeeStoreRef,
        employments: EmploymentStoreRef,
        payslips: PayslipStoreRef,
        events: EventBusRef,
    ) -> Self {
        Self {
            generator: PayrollGenerator::new(rates, employments.clone(), payslips.clone()),
            approver: PayrollApprover::new(payslips.clone(), events),
            guard: PayslipAccessGuard::new(
                employees.clone(),
                employments.clone(),
                payslips.clone(),
            ),
            employees,
            employments,
            payslips,
        }
    }

    /// Generates the payslips of a period.
    ///
    /// Payslips whose owner cannot be resolved are stored but left out of
    /// the returned views.
    pub async fn generate(&self, month: u32, year: i32) -> PayrollResult<Vec<PayslipView>> {
        let period = Period::new(month, year)?;
        let payslips = self.generator.generate(period).await?;
        self.written_views(payslips).await
    }

    /// Approves the pending payslips of a period.
    ///
    /// Payslips whose owner cannot be resolved are approved but left out of
    /// the returned views.
    pub async fn approve(&self, month: u32, year: i32) -> PayrollResult<Vec<PayslipView>> {
        let period = Period::new(month, year)?;
        let payslips = self.approver.approve(period).await?;
        self.written_views(payslips).await
    }

    /// Payslips of every employment of one employee for a period.
    pub async fn payslips_for_employee(
        &self,
        employee_id: Uuid,
        month: u32,
        year: i32,
    ) -> PayrollResult<Vec<PayslipView>> {
        let period = Period::new(month, year)?;
        self.employees
            .find_employee(employee_id)
            .await?
            .ok_or_else(|| PayrollError::not_found("Employee", employee_id))?;

        let ids: Vec<Uuid> = self
            .employments
            .find_employments_by_employee(employee_id)
            .await?
            .iter()
            .map(|e| e.id)
            .collect();
        let payslips = self
            .payslips
            .find_payslips_by_employments(&ids, Some(period))
            .await?;
        self.views(payslips).await
    }

    /// Every payslip of a period.
    pub async fn payslips_for_period(
        &self,
        month: u32,
        year: i32,
    ) -> PayrollResult<Vec<PayslipView>> {
        let period = Period::new(month, year)?;
        let payslips = self.payslips.find_payslips_by_period(period).await?;
        self.views(payslips).await
    }

    /// One payslip, if the requester may read it.
    pub async fn payslip_by_id(
        &self,
        id: Uuid,
        requester: &Requester,
    ) -> PayrollResult<PayslipView> {
        let payslip = self.guard.get_by_id(id, requester).await?;
        let mut views = self.views(vec![payslip]).await?;
        views
            .pop()
            .ok_or_else(|| PayrollError::not_found("Payslip", id))
    }

    /// The requester's PENDING payslips for a period, across all of their
    /// employments.
    pub async fn my_pending_payslips(
        &self,
        requester: &Requester,
        month: u32,
        year: i32,
    ) -> PayrollResult<Vec<PayslipView>> {
        let period = Period::new(month, year)?;
        let employee = self.guard.resolve(requester).await?;
        let mut views = self
            .payslips_for_employee(employee.id, period.month(), period.year())
            .await?;
        views.retain(|v| v.status == PayslipStatus::Pending);
        Ok(views)
    }

    /// All payslips of the requester's ACTIVE employments, any period.
    pub async fn my_payslips(&self, requester: &Requester) -> PayrollResult<Vec<PayslipView>> {
        let employee = self.guard.resolve(requester).await?;
        let ids: Vec<Uuid> = self
            .employments
            .find_employments_by_employee(employee.id)
            .await?
            .iter()
            .filter(|e| e.is_active())
            .map(|e| e.id)
            .collect();
        let payslips = self.payslips.find_payslips_by_employments(&ids, None).await?;
        self.views(payslips).await
    }

    async fn views(&self, payslips: Vec<Payslip>) -> PayrollResult<Vec<PayslipView>> {
        let mut join = ViewJoin::new(self);
        let mut views = Vec::with_capacity(payslips.len());
        for payslip in &payslips {
            views.push(join.view(payslip).await?);
        }
        Ok(views)
    }

    /// Joins rows that are already stored; an unresolvable owner is logged
    /// and its row skipped instead of failing the committed write.
    async fn written_views(&self, payslips: Vec<Payslip>) -> PayrollResult<Vec<PayslipView>> {
        let mut join = ViewJoin::new(self);
        let mut views = Vec::with_capacity(payslips.len());
        for payslip in &payslips {
            match join.view(payslip).await {
                Ok(view) => views.push(view),
                Err(err @ PayrollError::NotFound { .. }) => {
                    error!(
                        payslip_id = %payslip.id,
                        employment_id = %payslip.employment_id,
                        error = %err,
                        "Payslip stored but its owner could not be resolved"
                    );
                }
                Err(err) => return Err(err),
            }
        }
        Ok(views)
    }
}

/// Employment and employee lookups shared across one batch of payslips.
struct ViewJoin<'a> {
    service: &'a PayrollService,
    employments: HashMap<Uuid, Employment>,
    employees: HashMap<Uuid, Employee>,
}

impl<'a> ViewJoin<'a> {
    fn new(service: &'a PayrollService) -> Self {
        Self {
            service,
            employments: HashMap::new(),
            employees: HashMap::new(),
        }
    }

    async fn view(&mut self, payslip: &Payslip) -> PayrollResult<PayslipView> {
        if !self.employments.contains_key(&payslip.employment_id) {
            let employment = self
                .service
                .employments
                .find_employment(payslip.employment_id)
                .await?
                .ok_or_else(|| PayrollError::not_found("Employment", payslip.employment_id))?;
            self.employments.insert(employment.id, employment);
        }
        let employment = &self.employments[&payslip.employment_id];

        if !self.employees.contains_key(&employment.employee_id) {
            let employee = self
                .service
                .employees
                .find_employee(employment.employee_id)
                .await?
                .ok_or_else(|| PayrollError::not_found("Employee", employment.employee_id))?;
            self.employees.insert(employee.id, employee);
        }
        let employee = &self.employees[&employment.employee_id];

        Ok(PayslipView::new(payslip, employment, employee))
    }
}
