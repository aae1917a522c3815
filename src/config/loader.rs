//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configuration from YAML files.

use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{PayrollError, PayrollResult};
use crate::payroll::NewDeduction;

use super::types::{
    DeductionSeed, DeductionsConfig, InstitutionConfig, PayrollConfig, PayrollSettings,
    ServerConfig,
};

/// Environment variable naming the configuration directory.
pub const CONFIG_DIR_ENV: &str = "PAYROLL_CONFIG_DIR";

/// Directory used when [`CONFIG_DIR_ENV`] is unset.
pub const DEFAULT_CONFIG_DIR: &str = "./config/payroll";

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/payroll/
/// ├── payroll.yaml     # Institution, notification sender, bind address
/// └── deductions.yaml  # Deduction rates seeded at startup
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll")?;
/// println!("Paying institution: {}", loader.institution().name);
/// # Ok::<(), payroll_engine::error::PayrollError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing, contains invalid YAML,
    /// or lists a seed with a percentage outside 0-1 or a repeated code.
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<PayrollSettings>(&path.join("payroll.yaml"))?;

        let deductions_path = path.join("deductions.yaml");
        let deductions = Self::load_yaml::<DeductionsConfig>(&deductions_path)?.deductions;
        Self::validate_seeds(&deductions_path, &deductions)?;

        Ok(Self {
            config: PayrollConfig::new(settings, deductions),
        })
    }

    /// Loads from `$PAYROLL_CONFIG_DIR`, or [`DEFAULT_CONFIG_DIR`] when unset.
    pub fn from_env() -> PayrollResult<Self> {
        let dir = std::env::var(CONFIG_DIR_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
        Self::load(dir)
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_seeds(path: &Path, seeds: &[DeductionSeed]) -> PayrollResult<()> {
        let invalid = |message: String| PayrollError::ConfigParseError {
            path: path.display().to_string(),
            message,
        };

        let mut codes = HashSet::new();
        for seed in seeds {
            if seed.percentage < Decimal::ZERO || seed.percentage > Decimal::ONE {
                return Err(invalid(format!(
                    "percentage {} for {} is outside 0-1",
                    seed.percentage, seed.code
                )));
            }
            if !codes.insert(seed.code.as_str()) {
                return Err(invalid(format!("duplicate deduction code {}", seed.code)));
            }
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the paying institution.
    pub fn institution(&self) -> &InstitutionConfig {
        &self.config.settings().institution
    }

    /// Returns the sender address for salary notices.
    pub fn from_email(&self) -> &str {
        &self.config.settings().notifications.from_email
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.config.settings().server
    }

    /// Returns the deduction seeds ready to hand to
    /// [`DeductionService::seed`](crate::payroll::DeductionService::seed).
    pub fn deduction_seeds(&self) -> Vec<NewDeduction> {
        self.config.deductions().iter().map(NewDeduction::from).collect()
    }
}
