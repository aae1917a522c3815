//! Payroll Engine
//!
//! This crate computes monthly payslips from a configurable deduction rate
//! table, moves them through a PENDING to PAID approval lifecycle, and
//! notifies employees once their salary is approved.
//!
//! Persistence and message delivery sit behind the traits in [`store`] and
//! [`notification`]; an in-memory store and a log-only sender are included
//! so the engine runs end to end without external services.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod notification;
pub mod payroll;
pub mod store;
