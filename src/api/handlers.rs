//! HTTP request handlers for the payroll API.
//!
//! Identity arrives from the authenticating gateway in two headers:
//! `x-user-email` and `x-user-roles` (comma separated, e.g. `ADMIN,EMPLOYEE`).

use std::str::FromStr;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::PayrollError;
use crate::models::Role;
use crate::payroll::Requester;

use super::request::{DeductionRequest, DeductionUpdateRequest, PeriodRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Header carrying the requester's email.
pub const USER_EMAIL_HEADER: &str = "x-user-email";
/// Header carrying the requester's roles.
pub const USER_ROLES_HEADER: &str = "x-user-roles";

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/generate", post(generate_handler))
        .route("/payroll/approve", put(approve_handler))
        .route("/payslips", get(period_payslips_handler))
        .route("/payslips/me", get(my_payslips_handler))
        .route("/payslips/pending", get(my_pending_payslips_handler))
        .route("/payslips/employee/:id", get(employee_payslips_handler))
        .route("/payslips/:id", get(payslip_handler))
        .route(
            "/deductions",
            get(list_deductions_handler).post(create_deduction_handler),
        )
        .route(
            "/deductions/:id",
            get(get_deduction_handler)
                .put(update_deduction_handler)
                .delete(delete_deduction_handler),
        )
        .route("/deductions/code/:code", get(deduction_by_code_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Logs a failed service call under the request's correlation id.
fn failed(correlation_id: Uuid, error: PayrollError) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    error.into()
}

/// Reads the requester from the gateway headers. Unknown role names are
/// ignored.
fn requester(headers: &HeaderMap) -> ApiResult<Requester> {
    let email = headers
        .get(USER_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(ApiErrorResponse::unauthenticated)?;

    let roles = headers
        .get(USER_ROLES_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .split(',')
        .filter(|r| !r.trim().is_empty())
        .filter_map(|r| Role::from_str(r).ok())
        .collect();

    Ok(Requester::new(email, roles))
}

/// Reads the requester and checks that it holds one of `allowed`.
fn authorize(correlation_id: Uuid, headers: &HeaderMap, allowed: &[Role]) -> ApiResult<Requester> {
    let requester = requester(headers)?;
    if allowed.iter().any(|role| requester.has_role(*role)) {
        return Ok(requester);
    }
    warn!(
        correlation_id = %correlation_id,
        requester = %requester.email,
        "Requester lacks a required role"
    );
    Err(ApiErrorResponse::forbidden(format!(
        "{} lacks a required role",
        requester.email
    )))
}

fn json_body<T>(correlation_id: Uuid, payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

fn period_query(query: Result<Query<PeriodRequest>, QueryRejection>) -> ApiResult<PeriodRequest> {
    query.map(|Query(period)| period).map_err(|rejection| {
        ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
    })
}

fn id_path(path: Result<Path<Uuid>, PathRejection>) -> ApiResult<Uuid> {
    path.map(|Path(id)| id).map_err(|rejection| {
        ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
    })
}

/// Handler for POST /payroll/generate.
///
/// Open to MANAGER and ADMIN.
async fn generate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PeriodRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    let requester = authorize(correlation_id, &headers, &[Role::Manager, Role::Admin])?;
    let period = json_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        requester = %requester.email,
        month = period.month,
        year = period.year,
        "Processing payroll generation"
    );

    let views = state
        .payroll()
        .generate(period.month, period.year)
        .await
        .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        payslips = views.len(),
        "Payroll generation completed"
    );
    Ok(json_response(StatusCode::OK, views))
}

/// Handler for PUT /payroll/approve.
///
/// Open to ADMIN only.
async fn approve_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PeriodRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    let requester = authorize(correlation_id, &headers, &[Role::Admin])?;
    let period = json_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        requester = %requester.email,
        month = period.month,
        year = period.year,
        "Processing payroll approval"
    );

    let views = state
        .payroll()
        .approve(period.month, period.year)
        .await
        .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        payslips = views.len(),
        "Payroll approval completed"
    );
    Ok(json_response(StatusCode::OK, views))
}

/// Handler for GET /payslips?month&year.
async fn period_payslips_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PeriodRequest>, QueryRejection>,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    authorize(correlation_id, &headers, &[Role::Manager, Role::Admin])?;
    let period = period_query(query)?;

    let views = state
        .payroll()
        .payslips_for_period(period.month, period.year)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, views))
}

/// Handler for GET /payslips/employee/:id?month&year.
async fn employee_payslips_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PeriodRequest>, QueryRejection>,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    authorize(correlation_id, &headers, &[Role::Manager, Role::Admin])?;
    let employee_id = id_path(path)?;
    let period = period_query(query)?;

    let views = state
        .payroll()
        .payslips_for_employee(employee_id, period.month, period.year)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, views))
}

/// Handler for GET /payslips/me.
async fn my_payslips_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    let requester = requester(&headers)?;

    let views = state
        .payroll()
        .my_payslips(&requester)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, views))
}

/// Handler for GET /payslips/pending?month&year.
async fn my_pending_payslips_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PeriodRequest>, QueryRejection>,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    let requester = requester(&headers)?;
    let period = period_query(query)?;

    let views = state
        .payroll()
        .my_pending_payslips(&requester, period.month, period.year)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, views))
}

/// Handler for GET /payslips/:id.
///
/// Owners and privileged roles only; the access guard decides.
async fn payslip_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    let requester = requester(&headers)?;
    let id = id_path(path)?;

    let view = state
        .payroll()
        .payslip_by_id(id, &requester)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, view))
}

/// Handler for GET /deductions.
async fn list_deductions_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    requester(&headers)?;

    let rates = state
        .deductions()
        .list()
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, rates))
}

/// Handler for POST /deductions.
async fn create_deduction_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DeductionRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    let requester = authorize(correlation_id, &headers, &[Role::Admin])?;
    let request = json_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        requester = %requester.email,
        code = %request.code,
        "Creating deduction"
    );

    let rate = state
        .deductions()
        .create(request.into())
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::CREATED, rate))
}

/// Handler for GET /deductions/:id.
async fn get_deduction_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    requester(&headers)?;
    let id = id_path(path)?;

    let rate = state
        .deductions()
        .get(id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, rate))
}

/// Handler for GET /deductions/code/:code.
async fn deduction_by_code_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    requester(&headers)?;

    let rate = state
        .deductions()
        .get_by_code(&code)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, rate))
}

/// Handler for PUT /deductions/:id.
async fn update_deduction_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<DeductionUpdateRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    let requester = authorize(correlation_id, &headers, &[Role::Admin])?;
    let id = id_path(path)?;
    let request = json_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        requester = %requester.email,
        deduction_id = %id,
        "Updating deduction"
    );

    let rate = state
        .deductions()
        .update(id, request.into())
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, rate))
}

/// Handler for DELETE /deductions/:id.
async fn delete_deduction_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    let requester = authorize(correlation_id, &headers, &[Role::Admin])?;
    let id = id_path(path)?;
    info!(
        correlation_id = %correlation_id,
        requester = %requester.email,
        deduction_id = %id,
        "Deleting deduction"
    );

    state
        .deductions()
        .delete(id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}
