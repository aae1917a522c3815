//! Rate table lookup.
//!
//! The rate table maps deduction codes to percentages. Codes that are not
//! present fall back to the percentage built into [`DeductionCode`].

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{DeductionCode, DeductionRate};

/// A snapshot of deduction percentages keyed by code.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::RateTable;
/// use payroll_engine::models::DeductionCode;
/// use rust_decimal::Decimal;
///
/// let mut table = RateTable::default();
/// table.insert("PENSION", Decimal::new(8, 2));
///
/// assert_eq!(table.rate(DeductionCode::Pension), Decimal::new(8, 2));
/// // Absent codes use the built-in fallback.
/// assert_eq!(table.rate(DeductionCode::EmployeeTax), Decimal::new(30, 2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    /// Builds a table from stored deduction rates.
    pub fn from_deductions(deductions: &[DeductionRate]) -> Self {
        deductions
            .iter()
            .map(|d| (d.code.clone(), d.percentage))
            .collect()
    }

    /// Sets the percentage for a code.
    pub fn insert(&mut self, code: impl Into<String>, percentage: Decimal) {
        self.rates.insert(code.into(), percentage);
    }

    /// Returns the percentage for a code, or the code's fallback.
    pub fn rate(&self, code: DeductionCode) -> Decimal {
        self.rates
            .get(code.as_str())
            .copied()
            .unwrap_or_else(|| code.default_rate())
    }

    /// Number of codes explicitly present.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if no code is explicitly present.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn deduction(code: &str, percentage: &str) -> DeductionRate {
        DeductionRate {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: code.to_string(),
            percentage: dec(percentage),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_table_uses_fallbacks() {
        let table = RateTable::default();
        assert!(table.is_empty());
        for code in DeductionCode::ALL {
            assert_eq!(table.rate(code), code.default_rate());
        }
    }

    #[test]
    fn test_stored_rates_override_fallbacks() {
        let table = RateTable::from_deductions(&[
            deduction("EMP_TAX", "0.20"),
            deduction("HOUSING", "0.10"),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rate(DeductionCode::EmployeeTax), dec("0.20"));
        assert_eq!(table.rate(DeductionCode::Housing), dec("0.10"));
        assert_eq!(table.rate(DeductionCode::Transport), dec("0.14"));
    }

    #[test]
    fn test_unknown_codes_are_kept_but_ignored_by_lookup() {
        let table = RateTable::from_deductions(&[deduction("SOLIDARITY", "0.01")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rate(DeductionCode::Others), dec("0.05"));
    }

    #[test]
    fn test_zero_rate_is_not_replaced_by_fallback() {
        let mut table = RateTable::default();
        table.insert("PENSION", Decimal::ZERO);
        assert_eq!(table.rate(DeductionCode::Pension), Decimal::ZERO);
    }
}
