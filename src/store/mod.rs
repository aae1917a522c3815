//! Persistence for the payroll engine.
//!
//! The core only talks to the traits in this module. [`InMemoryStore`]
//! implements all of them and backs the binary and the tests.

mod memory;
mod ports;

pub use memory::InMemoryStore;
pub use ports::{
    EmployeeStore, EmployeeStoreRef, EmploymentStore, EmploymentStoreRef, NotificationLogStore,
    NotificationLogStoreRef, PayslipStore, PayslipStoreRef, RateStore, RateStoreRef,
};
