//! Payslip amount calculation.
//!
//! Allowances and withholdings are percentages of the base salary. Every
//! intermediate amount is rounded half-up to two decimals before it is used
//! in the next step, so the cents match the ledger exactly.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{DeductionCode, PayslipAmounts};

use super::RateTable;

/// Warning code attached when a negative net salary is clamped to zero.
pub const NEGATIVE_NET_SALARY_WARNING: &str = "NEGATIVE_NET_SALARY";

/// A recoverable condition noticed during calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

/// The result of a payslip calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayslipCalculation {
    /// The computed amounts.
    pub amounts: PayslipAmounts,
    /// Warnings raised while computing, e.g. a clamped net salary.
    pub warnings: Vec<CalculationWarning>,
}

/// Rounds a monetary amount half-up to exactly two decimal places.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("0.045").unwrap()).to_string(), "0.05");
/// assert_eq!(round_money(Decimal::from(7)).to_string(), "7.00");
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Computes the allowances, withholdings, gross and net salary for a base
/// salary.
///
/// ```text
/// house     = round(base * HOUSING)
/// transport = round(base * TRANSPORT)
/// gross     = round(base + house + transport)
/// withheld  = round(base * rate) for EMP_TAX, PENSION, MEDICAL_INSURANCE, OTHERS
/// net       = round(gross - round(sum of withheld)), clamped at 0.00
/// ```
///
/// Withholdings are taken from the base salary, not from gross. The base
/// salary is expected to be positive; callers validate it upstream.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{calculate_payslip, RateTable};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_payslip(
///     Decimal::from_str("1000000.00").unwrap(),
///     &RateTable::default(),
/// );
/// assert_eq!(result.amounts.gross_salary.to_string(), "1280000.00");
/// assert_eq!(result.amounts.net_salary.to_string(), "820000.00");
/// assert!(result.warnings.is_empty());
/// ```
pub fn calculate_payslip(base_salary: Decimal, rates: &RateTable) -> PayslipCalculation {
    let share = |code: DeductionCode| round_money(base_salary * rates.rate(code));

    let house_amount = share(DeductionCode::Housing);
    let transport_amount = share(DeductionCode::Transport);
    let gross_salary = round_money(base_salary + house_amount + transport_amount);

    let employee_taxed_amount = share(DeductionCode::EmployeeTax);
    let pension_amount = share(DeductionCode::Pension);
    let medical_insurance_amount = share(DeductionCode::MedicalInsurance);
    let other_taxed_amount = share(DeductionCode::Others);

    let total_deductions = round_money(
        employee_taxed_amount + pension_amount + medical_insurance_amount + other_taxed_amount,
    );

    let mut warnings = Vec::new();
    let mut net_salary = round_money(gross_salary - total_deductions);
    if net_salary < Decimal::ZERO {
        warnings.push(CalculationWarning {
            code: NEGATIVE_NET_SALARY_WARNING.to_string(),
            message: format!(
                "Net salary {} is negative (gross {} - deductions {}); set to 0.00",
                net_salary, gross_salary, total_deductions
            ),
        });
        net_salary = round_money(Decimal::ZERO);
    }

    PayslipCalculation {
        amounts: PayslipAmounts {
            house_amount,
            transport_amount,
            employee_taxed_amount,
            pension_amount,
            medical_insurance_amount,
            other_taxed_amount,
            gross_salary,
            net_salary,
        },
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_golden_one_million() {
        let result = calculate_payslip(dec("1000000.00"), &RateTable::default());
        let a = &result.amounts;

        assert_eq!(a.house_amount, dec("140000.00"));
        assert_eq!(a.transport_amount, dec("140000.00"));
        assert_eq!(a.gross_salary, dec("1280000.00"));
        assert_eq!(a.employee_taxed_amount, dec("300000.00"));
        assert_eq!(a.pension_amount, dec("60000.00"));
        assert_eq!(a.medical_insurance_amount, dec("50000.00"));
        assert_eq!(a.other_taxed_amount, dec("50000.00"));
        assert_eq!(a.total_deductions(), dec("460000.00"));
        assert_eq!(a.net_salary, dec("820000.00"));
        assert_eq!(a.net_salary.to_string(), "820000.00");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_rounding_at_each_step() {
        // 123456.78 * 0.14 = 17283.9492 -> 17283.95
        // 123456.78 * 0.30 = 37037.034  -> 37037.03
        // 123456.78 * 0.06 = 7407.4068  -> 7407.41
        // 123456.78 * 0.05 = 6172.839   -> 6172.84
        let result = calculate_payslip(dec("123456.78"), &RateTable::default());
        let a = &result.amounts;

        assert_eq!(a.house_amount, dec("17283.95"));
        assert_eq!(a.transport_amount, dec("17283.95"));
        assert_eq!(a.gross_salary, dec("158024.68"));
        assert_eq!(a.employee_taxed_amount, dec("37037.03"));
        assert_eq!(a.pension_amount, dec("7407.41"));
        assert_eq!(a.medical_insurance_amount, dec("6172.84"));
        assert_eq!(a.other_taxed_amount, dec("6172.84"));
        assert_eq!(a.net_salary, dec("101234.56"));
    }

    #[test]
    fn test_midpoint_rounds_up_not_to_even() {
        // 0.15 * 0.30 = 0.045: half-up gives 0.05, banker's rounding would give 0.04
        let result = calculate_payslip(dec("0.15"), &RateTable::default());
        assert_eq!(result.amounts.employee_taxed_amount, dec("0.05"));
        // 0.15 * 0.05 = 0.0075 -> 0.01
        assert_eq!(result.amounts.medical_insurance_amount, dec("0.01"));
        assert_eq!(result.amounts.net_salary, dec("0.11"));
    }

    #[test]
    fn test_custom_rates_are_applied() {
        let mut rates = RateTable::default();
        rates.insert("EMP_TAX", dec("0.20"));
        rates.insert("HOUSING", dec("0"));

        let result = calculate_payslip(dec("500000"), &rates);
        assert_eq!(result.amounts.house_amount, dec("0.00"));
        assert_eq!(result.amounts.employee_taxed_amount, dec("100000.00"));
        // gross = 500000 + 0 + 70000 = 570000; deductions = 100000 + 30000 + 25000 + 25000
        assert_eq!(result.amounts.gross_salary, dec("570000.00"));
        assert_eq!(result.amounts.net_salary, dec("390000.00"));
    }

    #[test]
    fn test_negative_net_is_clamped_with_warning() {
        let mut rates = RateTable::default();
        rates.insert("EMP_TAX", dec("1"));
        rates.insert("PENSION", dec("1"));

        let result = calculate_payslip(dec("1000.00"), &rates);
        // gross 1280.00, deductions 1000 + 1000 + 50 + 50 = 2100.00
        assert_eq!(result.amounts.gross_salary, dec("1280.00"));
        assert_eq!(result.amounts.net_salary, dec("0.00"));
        assert_eq!(result.amounts.net_salary.to_string(), "0.00");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, NEGATIVE_NET_SALARY_WARNING);
        assert!(result.warnings[0].message.contains("-820.00"));
    }

    #[test]
    fn test_net_of_exactly_zero_is_not_a_warning() {
        let mut rates = RateTable::default();
        rates.insert("HOUSING", dec("0"));
        rates.insert("TRANSPORT", dec("0"));
        rates.insert("EMP_TAX", dec("1"));
        rates.insert("PENSION", dec("0"));
        rates.insert("MEDICAL_INSURANCE", dec("0"));
        rates.insert("OTHERS", dec("0"));

        let result = calculate_payslip(dec("2500.00"), &rates);
        assert_eq!(result.amounts.net_salary, dec("0.00"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_round_money_always_has_two_decimals() {
        assert_eq!(round_money(dec("10")).to_string(), "10.00");
        assert_eq!(round_money(dec("10.1")).to_string(), "10.10");
        assert_eq!(round_money(dec("10.005")).to_string(), "10.01");
        assert_eq!(round_money(dec("10.004")).to_string(), "10.00");
    }

    proptest! {
        #[test]
        fn prop_default_rates_follow_formula(cents in 1i64..10_000_000_000i64) {
            let base = Decimal::new(cents, 2);
            let result = calculate_payslip(base, &RateTable::default());
            let a = &result.amounts;

            for amount in [
                a.house_amount,
                a.transport_amount,
                a.employee_taxed_amount,
                a.pension_amount,
                a.medical_insurance_amount,
                a.other_taxed_amount,
                a.gross_salary,
                a.net_salary,
            ] {
                prop_assert_eq!(amount.scale(), 2);
            }

            prop_assert_eq!(a.gross_salary, base + a.house_amount + a.transport_amount);
            prop_assert_eq!(a.net_salary, a.gross_salary - a.total_deductions());
            prop_assert!(a.net_salary > Decimal::ZERO);
            prop_assert!(result.warnings.is_empty());
        }

        #[test]
        fn prop_net_is_never_negative(
            cents in 1i64..1_000_000_000i64,
            tax_bp in 0i64..=10_000i64,
            pension_bp in 0i64..=10_000i64,
        ) {
            let mut rates = RateTable::default();
            rates.insert("EMP_TAX", Decimal::new(tax_bp, 4));
            rates.insert("PENSION", Decimal::new(pension_bp, 4));

            let result = calculate_payslip(Decimal::new(cents, 2), &rates);
            let a = &result.amounts;
            let raw_net = a.gross_salary - a.total_deductions();

            prop_assert!(a.net_salary >= Decimal::ZERO);
            if raw_net < Decimal::ZERO {
                prop_assert_eq!(a.net_salary, Decimal::ZERO);
                prop_assert_eq!(result.warnings.len(), 1);
            } else {
                prop_assert_eq!(a.net_salary, raw_net);
            }
        }
    }
}
