//! Employment model.
//!
//! An employment is one job assignment of an employee. Payroll runs over
//! employments, not employees.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employment status. Deactivation replaces deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Participates in payroll.
    Active,
    /// Kept for history, excluded from payroll.
    Inactive,
}

/// A job assignment with its salary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employment {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique employment code.
    pub code: String,
    /// The employee holding this employment.
    pub employee_id: Uuid,
    /// Department name.
    pub department: String,
    /// Position title.
    pub position: String,
    /// Monthly base salary, strictly positive.
    pub base_salary: Decimal,
    /// Whether the employment participates in payroll.
    pub status: EmploymentStatus,
    /// First day of the employment.
    pub join_date: NaiveDate,
}

impl Employment {
    /// Returns true if the employment participates in payroll.
    pub fn is_active(&self) -> bool {
        self.status == EmploymentStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_employment() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000010",
            "code": "EMPL-1",
            "employee_id": "00000000-0000-0000-0000-000000000001",
            "department": "IT",
            "position": "Developer",
            "base_salary": "1000000.00",
            "status": "active",
            "join_date": "2023-01-01"
        }"#;

        let employment: Employment = serde_json::from_str(json).unwrap();
        assert!(employment.is_active());
        assert_eq!(
            employment.base_salary,
            Decimal::from_str("1000000.00").unwrap()
        );
    }

    #[test]
    fn test_inactive_employment() {
        let json = r#""inactive""#;
        let status: EmploymentStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status, EmploymentStatus::Inactive);
    }
}
