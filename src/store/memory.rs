//! In-memory implementation of every persistence port.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    DeductionRate, Employee, Employment, EmploymentStatus, NotificationLog, Payslip,
    PayslipStatus, Period,
};

use super::ports::{
    EmployeeStore, EmploymentStore, NotificationLogStore, PayslipStore, RateStore,
};

#[derive(Default)]
struct Tables {
    rates: HashMap<Uuid, DeductionRate>,
    employees: HashMap<Uuid, Employee>,
    employments: HashMap<Uuid, Employment>,
    payslips: HashMap<Uuid, Payslip>,
    notifications: Vec<NotificationLog>,
}

impl Tables {
    /// Uniqueness of (employment, month, year), ignoring the row being replaced.
    fn check_payslip_slot(&self, payslip: &Payslip, replacing: Option<Uuid>) -> PayrollResult<()> {
        let taken = self.payslips.values().any(|p| {
            Some(p.id) != replacing
                && p.employment_id == payslip.employment_id
                && p.month == payslip.month
                && p.year == payslip.year
        });
        if taken {
            return Err(PayrollError::conflict(format!(
                "Payslip already exists for employment {} in {}/{}",
                payslip.employment_id, payslip.month, payslip.year
            )));
        }
        if Some(payslip.id) != replacing && self.payslips.contains_key(&payslip.id) {
            return Err(PayrollError::conflict(format!(
                "Payslip id already in use: {}",
                payslip.id
            )));
        }
        Ok(())
    }
}

fn sorted_payslips<'a>(iter: impl Iterator<Item = &'a Payslip>) -> Vec<Payslip> {
    let mut payslips: Vec<Payslip> = iter.cloned().collect();
    payslips.sort_by_key(|p| (p.year, p.month, p.processed_date, p.id));
    payslips
}

/// A thread-safe in-memory store for all payroll records.
///
/// All tables live behind one `Arc<RwLock<..>>`, so every trait method runs
/// as a single atomic unit.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the notification audit trail in append order.
    pub async fn notification_logs(&self) -> Vec<NotificationLog> {
        self.tables.read().await.notifications.clone()
    }
}

#[async_trait]
impl RateStore for InMemoryStore {
    async fn list_rates(&self) -> PayrollResult<Vec<DeductionRate>> {
        let tables = self.tables.read().await;
        let mut rates: Vec<DeductionRate> = tables.rates.values().cloned().collect();
        rates.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(rates)
    }

    async fn find_rate(&self, id: Uuid) -> PayrollResult<Option<DeductionRate>> {
        Ok(self.tables.read().await.rates.get(&id).cloned())
    }

    async fn find_rate_by_code(&self, code: &str) -> PayrollResult<Option<DeductionRate>> {
        let tables = self.tables.read().await;
        Ok(tables.rates.values().find(|r| r.code == code).cloned())
    }

    async fn find_rate_by_name(&self, name: &str) -> PayrollResult<Option<DeductionRate>> {
        let tables = self.tables.read().await;
        Ok(tables.rates.values().find(|r| r.name == name).cloned())
    }

    async fn insert_rate(&self, rate: DeductionRate) -> PayrollResult<DeductionRate> {
        let mut tables = self.tables.write().await;
        if tables.rates.values().any(|r| r.code == rate.code) {
            return Err(PayrollError::conflict(format!(
                "Deduction code already exists: {}",
                rate.code
            )));
        }
        if tables.rates.values().any(|r| r.name == rate.name) {
            return Err(PayrollError::conflict(format!(
                "Deduction name already exists: {}",
                rate.name
            )));
        }
        tables.rates.insert(rate.id, rate.clone());
        Ok(rate)
    }

    async fn update_rate(&self, rate: DeductionRate) -> PayrollResult<DeductionRate> {
        let mut tables = self.tables.write().await;
        if !tables.rates.contains_key(&rate.id) {
            return Err(PayrollError::not_found("Deduction", rate.id));
        }
        if tables
            .rates
            .values()
            .any(|r| r.id != rate.id && r.name == rate.name)
        {
            return Err(PayrollError::conflict(format!(
                "Deduction name already exists: {}",
                rate.name
            )));
        }
        tables.rates.insert(rate.id, rate.clone());
        Ok(rate)
    }

    async fn delete_rate(&self, id: Uuid) -> PayrollResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .rates
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PayrollError::not_found("Deduction", id))
    }
}

#[async_trait]
impl EmployeeStore for InMemoryStore {
    async fn find_employee(&self, id: Uuid) -> PayrollResult<Option<Employee>> {
        Ok(self.tables.read().await.employees.get(&id).cloned())
    }

    async fn find_employee_by_email(&self, email: &str) -> PayrollResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.values().find(|e| e.email == email).cloned())
    }

    async fn insert_employee(&self, employee: Employee) -> PayrollResult<Employee> {
        let mut tables = self.tables.write().await;
        for existing in tables.employees.values() {
            let clash = if existing.code == employee.code {
                Some(("code", &employee.code))
            } else if existing.email == employee.email {
                Some(("email", &employee.email))
            } else if existing.mobile == employee.mobile {
                Some(("mobile", &employee.mobile))
            } else {
                None
            };
            if let Some((field, value)) = clash {
                return Err(PayrollError::conflict(format!(
                    "Employee {} already exists: {}",
                    field, value
                )));
            }
        }
        tables.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }
}

#[async_trait]
impl EmploymentStore for InMemoryStore {
    async fn find_active_employments(&self) -> PayrollResult<Vec<Employment>> {
        let tables = self.tables.read().await;
        let mut active: Vec<Employment> = tables
            .employments
            .values()
            .filter(|e| e.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(active)
    }

    async fn find_employment(&self, id: Uuid) -> PayrollResult<Option<Employment>> {
        Ok(self.tables.read().await.employments.get(&id).cloned())
    }

    async fn find_employment_by_code(&self, code: &str) -> PayrollResult<Option<Employment>> {
        let tables = self.tables.read().await;
        Ok(tables.employments.values().find(|e| e.code == code).cloned())
    }

    async fn find_employments_by_employee(
        &self,
        employee_id: Uuid,
    ) -> PayrollResult<Vec<Employment>> {
        let tables = self.tables.read().await;
        let mut employments: Vec<Employment> = tables
            .employments
            .values()
            .filter(|e| e.employee_id == employee_id)
            .cloned()
            .collect();
        employments.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(employments)
    }

    async fn insert_employment(&self, employment: Employment) -> PayrollResult<Employment> {
        let mut tables = self.tables.write().await;
        if tables.employments.values().any(|e| e.code == employment.code) {
            return Err(PayrollError::conflict(format!(
                "Employment code already exists: {}",
                employment.code
            )));
        }
        tables.employments.insert(employment.id, employment.clone());
        Ok(employment)
    }

    async fn set_employment_status(
        &self,
        id: Uuid,
        status: EmploymentStatus,
    ) -> PayrollResult<Employment> {
        let mut tables = self.tables.write().await;
        let employment = tables
            .employments
            .get_mut(&id)
            .ok_or_else(|| PayrollError::not_found("Employment", id))?;
        employment.status = status;
        Ok(employment.clone())
    }
}

#[async_trait]
impl PayslipStore for InMemoryStore {
    async fn find_payslip(&self, id: Uuid) -> PayrollResult<Option<Payslip>> {
        Ok(self.tables.read().await.payslips.get(&id).cloned())
    }

    async fn find_payslip_for_employment(
        &self,
        employment_id: Uuid,
        period: Period,
    ) -> PayrollResult<Option<Payslip>> {
        let tables = self.tables.read().await;
        Ok(tables
            .payslips
            .values()
            .find(|p| p.employment_id == employment_id && p.is_for(period))
            .cloned())
    }

    async fn find_payslips_by_period(&self, period: Period) -> PayrollResult<Vec<Payslip>> {
        let tables = self.tables.read().await;
        Ok(sorted_payslips(
            tables.payslips.values().filter(|p| p.is_for(period)),
        ))
    }

    async fn find_payslips_by_period_and_status(
        &self,
        period: Period,
        status: PayslipStatus,
    ) -> PayrollResult<Vec<Payslip>> {
        let tables = self.tables.read().await;
        Ok(sorted_payslips(
            tables
                .payslips
                .values()
                .filter(|p| p.is_for(period) && p.status == status),
        ))
    }

    async fn find_payslips_by_employments(
        &self,
        employment_ids: &[Uuid],
        period: Option<Period>,
    ) -> PayrollResult<Vec<Payslip>> {
        let tables = self.tables.read().await;
        Ok(sorted_payslips(tables.payslips.values().filter(|p| {
            employment_ids.contains(&p.employment_id) && period.is_none_or(|period| p.is_for(period))
        })))
    }

    async fn insert_payslip(&self, payslip: Payslip) -> PayrollResult<Payslip> {
        let mut tables = self.tables.write().await;
        tables.check_payslip_slot(&payslip, None)?;
        tables.payslips.insert(payslip.id, payslip.clone());
        Ok(payslip)
    }

    async fn update_payslip(
        &self,
        id: Uuid,
        status: PayslipStatus,
        payment_date: Option<DateTime<Utc>>,
    ) -> PayrollResult<Payslip> {
        let mut tables = self.tables.write().await;
        let payslip = tables
            .payslips
            .get_mut(&id)
            .ok_or_else(|| PayrollError::not_found("Payslip", id))?;
        if payslip.is_paid() {
            return Err(PayrollError::conflict(format!(
                "Payslip {} is already paid",
                id
            )));
        }
        payslip.status = status;
        payslip.payment_date = payment_date;
        Ok(payslip.clone())
    }

    async fn approve_payslips(
        &self,
        ids: &[Uuid],
        payment_date: DateTime<Utc>,
    ) -> PayrollResult<Vec<Payslip>> {
        let mut tables = self.tables.write().await;

        for id in ids {
            let payslip = tables
                .payslips
                .get(id)
                .ok_or_else(|| PayrollError::not_found("Payslip", id))?;
            if payslip.status != PayslipStatus::Pending {
                return Err(PayrollError::conflict(format!(
                    "Payslip {} is no longer pending",
                    id
                )));
            }
        }

        let mut approved = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(payslip) = tables.payslips.get_mut(id) {
                payslip.status = PayslipStatus::Paid;
                payslip.payment_date = Some(payment_date);
                approved.push(payslip.clone());
            }
        }
        Ok(approved)
    }

    async fn replace_pending_payslip(
        &self,
        stale: Option<Uuid>,
        fresh: Payslip,
    ) -> PayrollResult<Payslip> {
        let mut tables = self.tables.write().await;

        // Validate everything before touching the table so a failure leaves
        // the stale row in place.
        if let Some(stale_id) = stale {
            let existing = tables
                .payslips
                .get(&stale_id)
                .ok_or_else(|| PayrollError::not_found("Payslip", stale_id))?;
            if existing.status != PayslipStatus::Pending {
                return Err(PayrollError::conflict(format!(
                    "Payslip {} is no longer pending",
                    stale_id
                )));
            }
        }
        tables.check_payslip_slot(&fresh, stale)?;

        if let Some(stale_id) = stale {
            tables.payslips.remove(&stale_id);
        }
        tables.payslips.insert(fresh.id, fresh.clone());
        Ok(fresh)
    }
}

#[async_trait]
impl NotificationLogStore for InMemoryStore {
    async fn append_notification(&self, entry: NotificationLog) -> PayrollResult<()> {
        self.tables.write().await.notifications.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeStatus, PayslipAmounts, Role};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn period() -> Period {
        Period::new(5, 2025).unwrap()
    }

    fn employee(code: &str, email: &str, mobile: &str) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            code: code.to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            mobile: mobile.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            roles: vec![Role::Employee],
            status: EmployeeStatus::Active,
        }
    }

    fn employment(code: &str, employee_id: Uuid) -> Employment {
        Employment {
            id: Uuid::new_v4(),
            code: code.to_string(),
            employee_id,
            department: "IT".to_string(),
            position: "Developer".to_string(),
            base_salary: dec("1000000.00"),
            status: EmploymentStatus::Active,
            join_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        }
    }

    fn payslip(employment_id: Uuid, status: PayslipStatus) -> Payslip {
        Payslip {
            id: Uuid::new_v4(),
            employment_id,
            amounts: PayslipAmounts {
                house_amount: dec("140000.00"),
                transport_amount: dec("140000.00"),
                employee_taxed_amount: dec("300000.00"),
                pension_amount: dec("60000.00"),
                medical_insurance_amount: dec("50000.00"),
                other_taxed_amount: dec("50000.00"),
                gross_salary: dec("1280000.00"),
                net_salary: dec("820000.00"),
            },
            month: 5,
            year: 2025,
            status,
            processed_date: Utc::now(),
            payment_date: None,
        }
    }

    fn rate(code: &str, name: &str) -> DeductionRate {
        DeductionRate {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            percentage: dec("0.05"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_payslip_for_period_is_a_conflict() {
        let store = InMemoryStore::new();
        let employment_id = Uuid::new_v4();

        store
            .insert_payslip(payslip(employment_id, PayslipStatus::Pending))
            .await
            .unwrap();
        let result = store
            .insert_payslip(payslip(employment_id, PayslipStatus::Pending))
            .await;

        assert!(matches!(result, Err(PayrollError::Conflict { .. })));
        assert_eq!(store.find_payslips_by_period(period()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_employment_different_month_is_allowed() {
        let store = InMemoryStore::new();
        let employment_id = Uuid::new_v4();

        store
            .insert_payslip(payslip(employment_id, PayslipStatus::Pending))
            .await
            .unwrap();
        let mut june = payslip(employment_id, PayslipStatus::Pending);
        june.month = 6;
        assert!(store.insert_payslip(june).await.is_ok());
    }

    #[tokio::test]
    async fn test_replace_pending_swaps_rows_atomically() {
        let store = InMemoryStore::new();
        let employment_id = Uuid::new_v4();
        let stale = store
            .insert_payslip(payslip(employment_id, PayslipStatus::Pending))
            .await
            .unwrap();

        let mut fresh = payslip(employment_id, PayslipStatus::Pending);
        fresh.amounts.net_salary = dec("900000.00");
        let stored = store
            .replace_pending_payslip(Some(stale.id), fresh.clone())
            .await
            .unwrap();

        assert_eq!(stored.id, fresh.id);
        assert!(store.find_payslip(stale.id).await.unwrap().is_none());
        let found = store
            .find_payslip_for_employment(employment_id, period())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.amounts.net_salary, dec("900000.00"));
    }

    #[tokio::test]
    async fn test_replace_refuses_paid_rows() {
        let store = InMemoryStore::new();
        let employment_id = Uuid::new_v4();
        let paid = store
            .insert_payslip(payslip(employment_id, PayslipStatus::Paid))
            .await
            .unwrap();

        let result = store
            .replace_pending_payslip(Some(paid.id), payslip(employment_id, PayslipStatus::Pending))
            .await;

        assert!(matches!(result, Err(PayrollError::Conflict { .. })));
        let still_there = store.find_payslip(paid.id).await.unwrap().unwrap();
        assert!(still_there.is_paid());
    }

    #[tokio::test]
    async fn test_replace_without_stale_behaves_as_insert() {
        let store = InMemoryStore::new();
        let employment_id = Uuid::new_v4();
        store
            .insert_payslip(payslip(employment_id, PayslipStatus::Pending))
            .await
            .unwrap();

        let result = store
            .replace_pending_payslip(None, payslip(employment_id, PayslipStatus::Pending))
            .await;
        assert!(matches!(result, Err(PayrollError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_only_touches_status_and_payment_date() {
        let store = InMemoryStore::new();
        let stored = store
            .insert_payslip(payslip(Uuid::new_v4(), PayslipStatus::Pending))
            .await
            .unwrap();
        let paid_at = Utc::now();

        let updated = store
            .update_payslip(stored.id, PayslipStatus::Paid, Some(paid_at))
            .await
            .unwrap();

        assert_eq!(updated.status, PayslipStatus::Paid);
        assert_eq!(updated.payment_date, Some(paid_at));
        assert_eq!(updated.amounts, stored.amounts);

        let again = store
            .update_payslip(stored.id, PayslipStatus::Pending, None)
            .await;
        assert!(matches!(again, Err(PayrollError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_batch_approval_marks_every_row() {
        let store = InMemoryStore::new();
        let first = store
            .insert_payslip(payslip(Uuid::new_v4(), PayslipStatus::Pending))
            .await
            .unwrap();
        let second = store
            .insert_payslip(payslip(Uuid::new_v4(), PayslipStatus::Pending))
            .await
            .unwrap();
        let paid_at = Utc::now();

        let approved = store
            .approve_payslips(&[first.id, second.id], paid_at)
            .await
            .unwrap();

        assert_eq!(approved.len(), 2);
        assert!(approved.iter().all(|p| p.is_paid()));
        assert!(approved.iter().all(|p| p.payment_date == Some(paid_at)));
    }

    #[tokio::test]
    async fn test_batch_approval_with_a_paid_row_changes_nothing() {
        let store = InMemoryStore::new();
        let pending = store
            .insert_payslip(payslip(Uuid::new_v4(), PayslipStatus::Pending))
            .await
            .unwrap();
        let paid = store
            .insert_payslip(payslip(Uuid::new_v4(), PayslipStatus::Paid))
            .await
            .unwrap();

        let result = store
            .approve_payslips(&[pending.id, paid.id], Utc::now())
            .await;

        assert!(matches!(result, Err(PayrollError::Conflict { .. })));
        let untouched = store.find_payslip(pending.id).await.unwrap().unwrap();
        assert_eq!(untouched.status, PayslipStatus::Pending);
        assert!(untouched.payment_date.is_none());
    }

    #[tokio::test]
    async fn test_batch_approval_with_unknown_id_changes_nothing() {
        let store = InMemoryStore::new();
        let pending = store
            .insert_payslip(payslip(Uuid::new_v4(), PayslipStatus::Pending))
            .await
            .unwrap();

        let result = store
            .approve_payslips(&[pending.id, Uuid::new_v4()], Utc::now())
            .await;

        assert!(matches!(
            result,
            Err(PayrollError::NotFound { entity: "Payslip", .. })
        ));
        let untouched = store.find_payslip(pending.id).await.unwrap().unwrap();
        assert_eq!(untouched.status, PayslipStatus::Pending);
    }

    #[tokio::test]
    async fn test_filter_by_period_and_status() {
        let store = InMemoryStore::new();
        store
            .insert_payslip(payslip(Uuid::new_v4(), PayslipStatus::Pending))
            .await
            .unwrap();
        store
            .insert_payslip(payslip(Uuid::new_v4(), PayslipStatus::Paid))
            .await
            .unwrap();

        let pending = store
            .find_payslips_by_period_and_status(period(), PayslipStatus::Pending)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].status, PayslipStatus::Pending);
    }

    #[tokio::test]
    async fn test_employee_uniqueness() {
        let store = InMemoryStore::new();
        store
            .insert_employee(employee("EMP-1", "a@example.com", "0788000001"))
            .await
            .unwrap();

        for dup in [
            employee("EMP-1", "b@example.com", "0788000002"),
            employee("EMP-2", "a@example.com", "0788000003"),
            employee("EMP-3", "c@example.com", "0788000001"),
        ] {
            let result = store.insert_employee(dup).await;
            assert!(matches!(result, Err(PayrollError::Conflict { .. })));
        }
    }

    #[tokio::test]
    async fn test_inactive_employments_are_not_active() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let first = store.insert_employment(employment("EMPL-1", owner)).await.unwrap();
        store.insert_employment(employment("EMPL-2", owner)).await.unwrap();

        store
            .set_employment_status(first.id, EmploymentStatus::Inactive)
            .await
            .unwrap();

        let active = store.find_active_employments().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].code, "EMPL-2");
        assert_eq!(store.find_employments_by_employee(owner).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_rate_code_and_name_are_unique() {
        let store = InMemoryStore::new();
        store.insert_rate(rate("PENSION", "Pension")).await.unwrap();

        let same_code = store.insert_rate(rate("PENSION", "Pension 2")).await;
        let same_name = store.insert_rate(rate("PENSION_2", "Pension")).await;

        assert!(matches!(same_code, Err(PayrollError::Conflict { .. })));
        assert!(matches!(same_name, Err(PayrollError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_delete_missing_rate_is_not_found() {
        let store = InMemoryStore::new();
        let result = store.delete_rate(Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(PayrollError::NotFound { entity: "Deduction", .. })
        ));
    }
}
