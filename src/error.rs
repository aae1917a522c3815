//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while generating, approving and
//! reading payroll.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// Stores, services and the HTTP layer all speak this type, so a conflict
/// raised deep inside a store reaches the caller unchanged.
///
/// # Example
///
/// ```
/// use payroll_engine::error::PayrollError;
///
/// let error = PayrollError::NotFound {
///     entity: "Payslip",
///     key: "42".to_string(),
/// };
/// assert_eq!(error.to_string(), "Payslip not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: &'static str,
        /// The id, code or email used for the lookup.
        key: String,
    },

    /// A write would break a uniqueness rule or overwrite settled data.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflicting state.
        message: String,
    },

    /// The requester is known but may not access the record.
    #[error("Access denied: {message}")]
    AccessDenied {
        /// Why access was refused.
        message: String,
    },

    /// The payroll period is outside the accepted range.
    #[error("Invalid payroll period {month}/{year}: month must be 1-12 and year four digits")]
    InvalidPeriod {
        /// The requested month.
        month: u32,
        /// The requested year.
        year: i32,
    },

    /// A deduction rate request carried an invalid field.
    #[error("Invalid deduction field '{field}': {message}")]
    InvalidDeduction {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The approval event could not be handed to the notification worker.
    #[error("Event bus error: {message}")]
    EventBus {
        /// A description of the failure.
        message: String,
    },

    /// A storage backend failed for reasons unrelated to the request.
    ///
    /// Raised by external implementations of the store ports; callers
    /// propagate it unchanged.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the backend failure.
        message: String,
    },
}

impl PayrollError {
    /// Shorthand for a [`PayrollError::NotFound`] keyed by anything printable.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Shorthand for a [`PayrollError::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;
