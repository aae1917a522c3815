//! Configuration loading for the payroll engine.
//!
//! This module loads the paying institution, notification sender, server
//! address and the deduction rates seeded at startup from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll").unwrap();
//! println!("Institution: {}", config.institution().name);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, CONFIG_DIR_ENV, DEFAULT_CONFIG_DIR};
pub use types::{
    DeductionSeed, DeductionsConfig, InstitutionConfig, NotificationConfig, PayrollConfig,
    PayrollSettings, ServerConfig,
};
