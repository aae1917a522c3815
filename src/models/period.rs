//! Payroll period model.
//!
//! A period is the (month, year) pair that groups payslips for generation
//! and approval.

use std::fmt;

use chrono::Month;
use serde::Serialize;

use crate::error::{PayrollError, PayrollResult};

/// A validated calendar month of payroll.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Period;
///
/// let period = Period::new(5, 2025).unwrap();
/// assert_eq!(period.month_name(), "May");
/// assert!(Period::new(13, 2025).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    /// Creates a period, rejecting months outside 1-12 and years that are
    /// not four digits.
    pub fn new(month: u32, year: i32) -> PayrollResult<Self> {
        if !(1..=12).contains(&month) || !(1000..=9999).contains(&year) {
            return Err(PayrollError::InvalidPeriod { month, year });
        }
        Ok(Self { month, year })
    }

    /// The month, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The four-digit year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The English name of the month, e.g. "January".
    pub fn month_name(&self) -> &'static str {
        // month is validated to 1-12 on construction
        Month::try_from(self.month as u8)
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}
