//! Employee model and related types.
//!
//! This module defines the Employee struct together with the role and
//! status enums used for access checks and soft deletion.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A role held by an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access, including payroll approval.
    Admin,
    /// May run payroll and read any payslip.
    Manager,
    /// Regular employee; may read their own payslips.
    Employee,
}

impl Role {
    /// Returns true for roles that may read any payslip.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl FromStr for Role {
    type Err = String;

    /// Parses "admin", "ADMIN" and "ROLE_ADMIN" alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.strip_prefix("role_").unwrap_or(&normalized) {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Employee account status. Disabling replaces deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// The employee is active.
    Active,
    /// The employee has been disabled.
    Disabled,
}

/// A person on the payroll.
///
/// # Examples
///
/// ```
/// use payroll_engine::models::{Employee, EmployeeStatus, Role};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let employee = Employee {
///     id: Uuid::new_v4(),
///     code: "EMP-12345".to_string(),
///     first_name: "John".to_string(),
///     last_name: "Doe".to_string(),
///     email: "john.doe@example.com".to_string(),
///     mobile: "0788000001".to_string(),
///     date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
///     roles: vec![Role::Employee],
///     status: EmployeeStatus::Active,
/// };
/// assert_eq!(employee.full_name(), "John Doe");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// Unique employee code.
    pub code: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique email address, also the login identity.
    pub email: String,
    /// Unique mobile number.
    pub mobile: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Roles granted to the employee.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Account status.
    pub status: EmployeeStatus,
}

impl Employee {
    /// Returns "first last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parses_common_spellings() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("ROLE_MANAGER".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!(" Employee ".parse::<Role>().unwrap(), Role::Employee);
        assert!("auditor".parse::<Role>().is_err());
    }

    #[test]
    fn test_privileged_roles() {
        assert!(Role::Admin.is_privileged());
        assert!(Role::Manager.is_privileged());
        assert!(!Role::Employee.is_privileged());
    }

    #[test]
    fn test_deserialize_employee() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "code": "EMP-1",
            "first_name": "Jane",
            "last_name": "Uwase",
            "email": "jane@example.com",
            "mobile": "0788000002",
            "date_of_birth": "1992-04-01",
            "roles": ["manager"],
            "status": "active"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.full_name(), "Jane Uwase");
        assert_eq!(employee.roles, vec![Role::Manager]);
        assert_eq!(employee.status, EmployeeStatus::Active);
    }
}
