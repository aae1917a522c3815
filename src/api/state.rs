//! Application state for the payroll API.

use std::sync::Arc;

use crate::notification::EventBusRef;
use crate::payroll::{DeductionService, PayrollService};
use crate::store::{EmployeeStore, EmploymentStore, PayslipStore, RateStore};

/// Shared application state.
///
/// Holds the services every handler calls into.
#[derive(Clone)]
pub struct AppState {
    payroll: Arc<PayrollService>,
    deductions: Arc<DeductionService>,
}

impl AppState {
    /// Creates a new application state from the two services.
    pub fn new(payroll: PayrollService, deductions: DeductionService) -> Self {
        Self {
            payroll: Arc::new(payroll),
            deductions: Arc::new(deductions),
        }
    }

    /// Wires both services over one backend that implements every store.
    pub fn from_store<S>(store: Arc<S>, events: EventBusRef) -> Self
    where
        S: RateStore + EmployeeStore + EmploymentStore + PayslipStore + 'static,
    {
        let payroll = PayrollService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            events,
        );
        Self::new(payroll, DeductionService::new(store))
    }

    /// Returns the payroll service.
    pub fn payroll(&self) -> &PayrollService {
        &self.payroll
    }

    /// Returns the deduction service.
    pub fn deductions(&self) -> &DeductionService {
        &self.deductions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }
}
