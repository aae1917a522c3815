//! HTTP API module for the payroll engine.
//!
//! This module exposes payroll generation, approval, payslip queries and
//! deduction administration over REST.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{create_router, USER_EMAIL_HEADER, USER_ROLES_HEADER};
pub use request::{DeductionRequest, DeductionUpdateRequest, PeriodRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
