//! Per-record payslip access checks.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Employee, Payslip, Role};
use crate::store::{EmployeeStoreRef, EmploymentStoreRef, PayslipStoreRef};

/// The identity a request is made under.
///
/// Authentication happens upstream; this crate only sees the resulting email
/// and role set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    /// Email of the authenticated employee.
    pub email: String,
    /// Roles granted to the requester.
    pub roles: Vec<Role>,
}

impl Requester {
    /// Creates a requester.
    pub fn new(email: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            email: email.into(),
            roles,
        }
    }

    /// Returns true if the requester holds ADMIN or MANAGER.
    pub fn is_privileged(&self) -> bool {
        self.roles.iter().any(Role::is_privileged)
    }

    /// Returns true if the requester holds `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Decides whether a requester may read a given payslip.
pub struct PayslipAccessGuard {
    employees: EmployeeStoreRef,
    employments: EmploymentStoreRef,
    payslips: PayslipStoreRef,
}

impl PayslipAccessGuard {
    /// Creates a guard over the given stores.
    pub fn new(
        employees: EmployeeStoreRef,
        employments: EmploymentStoreRef,
        payslips: PayslipStoreRef,
    ) -> Self {
        Self {
            employees,
            employments,
            payslips,
        }
    }

    /// Resolves the requester's employee record.
    pub async fn resolve(&self, requester: &Requester) -> PayrollResult<Employee> {
        self.employees
            .find_employee_by_email(&requester.email)
            .await?
            .ok_or_else(|| PayrollError::not_found("Employee", &requester.email))
    }

    /// Returns the payslip if the requester owns it through one of their
    /// ACTIVE employments or holds a privileged role.
    pub async fn get_by_id(&self, id: Uuid, requester: &Requester) -> PayrollResult<Payslip> {
        let employee = self.resolve(requester).await?;
        let payslip = self
            .payslips
            .find_payslip(id)
            .await?
            .ok_or_else(|| PayrollError::not_found("Payslip", id))?;

        if requester.is_privileged() {
            return Ok(payslip);
        }

        let owns = self
            .employments
            .find_employments_by_employee(employee.id)
            .await?
            .iter()
            .any(|e| e.is_active() && e.id == payslip.employment_id);
        if owns {
            return Ok(payslip);
        }

        warn!(
            requester = %requester.email,
            payslip_id = %id,
            "Payslip access denied"
        );
        Err(PayrollError::AccessDenied {
            message: "You can only view your own payslips".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmploymentStatus, Period};
    use crate::payroll::test_support::{add_employee, add_employment, fixture, Fixture};
    use crate::store::EmploymentStore;
    use std::sync::Arc;

    async fn setup() -> (Fixture, PayslipAccessGuard, Payslip) {
        let f = fixture().await;
        let payslips = f
            .generator()
            .generate(Period::new(5, 2025).unwrap())
            .await
            .unwrap();
        let shared = Arc::new(f.store.clone());
        let guard = PayslipAccessGuard::new(shared.clone(), shared.clone(), shared);
        (f, guard, payslips[0].clone())
    }

    #[test]
    fn test_requester_privilege() {
        assert!(Requester::new("a@x.com", vec![Role::Manager]).is_privileged());
        assert!(Requester::new("a@x.com", vec![Role::Employee, Role::Admin]).is_privileged());
        assert!(!Requester::new("a@x.com", vec![Role::Employee]).is_privileged());
        assert!(!Requester::new("a@x.com", vec![]).is_privileged());
    }

    #[tokio::test]
    async fn test_owner_can_read() {
        let (f, guard, payslip) = setup().await;
        let owner = Requester::new(f.employee.email.clone(), vec![Role::Employee]);

        let found = guard.get_by_id(payslip.id, &owner).await.unwrap();
        assert_eq!(found.id, payslip.id);
    }

    #[tokio::test]
    async fn test_other_employee_is_denied() {
        let (f, guard, payslip) = setup().await;
        let other = add_employee(&f.store, 2, vec![Role::Employee]).await;
        add_employment(&f.store, other.id, "EMPL-OTHER", "300000.00").await;

        let result = guard
            .get_by_id(payslip.id, &Requester::new(other.email, vec![Role::Employee]))
            .await;
        assert!(matches!(result, Err(PayrollError::AccessDenied { .. })));
    }

    #[tokio::test]
    async fn test_manager_and_admin_can_read_any() {
        let (f, guard, payslip) = setup().await;
        let manager = add_employee(&f.store, 3, vec![Role::Manager]).await;
        let admin = add_employee(&f.store, 4, vec![Role::Admin]).await;

        for (email, role) in [(manager.email, Role::Manager), (admin.email, Role::Admin)] {
            let found = guard
                .get_by_id(payslip.id, &Requester::new(email, vec![role]))
                .await
                .unwrap();
            assert_eq!(found.id, payslip.id);
        }
    }

    #[tokio::test]
    async fn test_deactivated_owner_is_denied() {
        let (f, guard, payslip) = setup().await;
        f.store
            .set_employment_status(f.employment.id, EmploymentStatus::Inactive)
            .await
            .unwrap();

        let result = guard
            .get_by_id(payslip.id, &Requester::new(f.employee.email.clone(), vec![Role::Employee]))
            .await;
        assert!(matches!(result, Err(PayrollError::AccessDenied { .. })));
    }

    #[tokio::test]
    async fn test_unknown_requester_and_payslip_are_not_found() {
        let (f, guard, payslip) = setup().await;

        let stranger = guard
            .get_by_id(payslip.id, &Requester::new("nobody@example.com", vec![Role::Admin]))
            .await;
        assert!(matches!(stranger, Err(PayrollError::NotFound { entity: "Employee", .. })));

        let missing = guard
            .get_by_id(
                Uuid::new_v4(),
                &Requester::new(f.employee.email.clone(), vec![Role::Employee]),
            )
            .await;
        assert!(matches!(missing, Err(PayrollError::NotFound { entity: "Payslip", .. })));
    }
}
