//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::payroll::NewDeduction;

/// The organization that pays the salaries.
#[derive(Debug, Clone, Deserialize)]
pub struct InstitutionConfig {
    /// Name shown in salary notices, e.g. "Government of Rwanda".
    pub name: String,
}

/// Settings for outgoing notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Sender address of salary notices.
    pub from_email: String,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the server listens on, e.g. "0.0.0.0:8080".
    pub bind_address: String,
}

/// Contents of `payroll.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollSettings {
    /// Paying institution.
    pub institution: InstitutionConfig,
    /// Notification settings.
    pub notifications: NotificationConfig,
    /// Server settings.
    pub server: ServerConfig,
}

/// A deduction rate inserted at startup when its code is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct DeductionSeed {
    /// Unique code, e.g. "EMP_TAX".
    pub code: String,
    /// Display name.
    pub name: String,
    /// Fraction of base salary.
    pub percentage: Decimal,
}

impl From<&DeductionSeed> for NewDeduction {
    fn from(seed: &DeductionSeed) -> Self {
        NewDeduction {
            code: seed.code.clone(),
            name: seed.name.clone(),
            percentage: seed.percentage,
        }
    }
}

/// Contents of `deductions.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeductionsConfig {
    /// Rates to seed.
    pub deductions: Vec<DeductionSeed>,
}

/// Complete payroll configuration.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    settings: PayrollSettings,
    deductions: Vec<DeductionSeed>,
}

impl PayrollConfig {
    /// Creates a new payroll configuration from its parts.
    pub fn new(settings: PayrollSettings, deductions: Vec<DeductionSeed>) -> Self {
        Self {
            settings,
            deductions,
        }
    }

    /// Returns the settings from `payroll.yaml`.
    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }

    /// Returns the deduction seeds.
    pub fn deductions(&self) -> &[DeductionSeed] {
        &self.deductions
    }
}
