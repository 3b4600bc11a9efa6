use axum::{
    extract::{Path, State},
    Json,
};
use http::StatusCode;

use crate::api::requests::{CreditBody, DebitBody};
use crate::api::responses::{
    ApiResponse, BalanceResponse, DebitHistoryResponse, ErrorResponse, HealthResponse,
    ValidationErrorDetail,
};
use crate::error::AppError;
use crate::models::Currency;
use crate::services::{CreditRequest, DebitRequest};

use super::routes::AppState;

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

fn validation_error(errors: Vec<crate::api::requests::ValidationError>) -> HandlerError {
    let details: Vec<ValidationErrorDetail> = errors
        .into_iter()
        .map(|e| ValidationErrorDetail {
            field: e.field,
            message: e.message,
        })
        .collect();

    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error(
            ErrorResponse::new("VALIDATION_ERROR", "Request validation failed").with_details(details),
        )),
    )
}

fn map_error(err: AppError) -> HandlerError {
    match err {
        AppError::InsufficientCredit { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(ErrorResponse::new(
                "INSUFFICIENT_CREDIT",
                err.to_string(),
            ))),
        ),
        AppError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(ErrorResponse::new("VALIDATION_ERROR", msg))),
        ),
        AppError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(ErrorResponse::new("NOT_FOUND", msg))),
        ),
        err => {
            tracing::error!("Request failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                ))),
            )
        }
    }
}

/// Parses a currency the request body already validated.
fn parse_currency(code: &str) -> Result<Currency, HandlerError> {
    code.parse::<Currency>().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(ErrorResponse::new(
                "VALIDATION_ERROR",
                e.to_string(),
            ))),
        )
    })
}

/// Apply a credit grant to a customer account.
pub async fn post_credit(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(body): Json<CreditBody>,
) -> Result<Json<ApiResponse<BalanceResponse>>, HandlerError> {
    if let Err(errors) = body.validate() {
        return Err(validation_error(errors));
    }
    let currency = parse_currency(&body.money.currency)?;

    let request = CreditRequest::new(body.credit_type, body.money.amount, currency, body.transaction_id);

    match state.service.process_credit(&customer_id, request).await {
        Ok(snapshot) => Ok(Json(ApiResponse::success(BalanceResponse::from_snapshot(
            customer_id,
            snapshot,
        )))),
        Err(err) => Err(map_error(err)),
    }
}

/// Charge a debit against a customer's available credit.
pub async fn post_debit(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(body): Json<DebitBody>,
) -> Result<Json<ApiResponse<BalanceResponse>>, HandlerError> {
    if let Err(errors) = body.validate() {
        return Err(validation_error(errors));
    }
    let currency = parse_currency(&body.money.currency)?;

    let request = DebitRequest::new(body.invoice_id, body.money.amount, currency);

    match state.service.process_debit(&customer_id, request).await {
        Ok(snapshot) => Ok(Json(ApiResponse::success(BalanceResponse::from_snapshot(
            customer_id,
            snapshot,
        )))),
        Err(err) => Err(map_error(err)),
    }
}

/// Current balance; an unknown customer yields an empty balance, not an
/// error.
pub async fn get_balance(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Json<ApiResponse<BalanceResponse>> {
    let snapshot = state.service.get_balance(&customer_id).await;
    Json(ApiResponse::success(BalanceResponse::from_snapshot(
        customer_id,
        snapshot,
    )))
}

/// Debit history; empty for unknown customers.
pub async fn get_history(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Json<ApiResponse<DebitHistoryResponse>> {
    let debits = state.service.debit_history(&customer_id).await;
    Json(ApiResponse::success(DebitHistoryResponse::new(customer_id, debits)))
}

/// Delete a customer account, returning its balance as of deletion. An
/// unknown customer yields an empty success body.
pub async fn delete_account(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Json<ApiResponse<BalanceResponse>> {
    match state.service.delete_account(&customer_id).await {
        Some(snapshot) => Json(ApiResponse::success(BalanceResponse::from_snapshot(
            customer_id,
            snapshot,
        ))),
        None => Json(ApiResponse::success_empty()),
    }
}

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let report = state.health.report(state.service.registry().slot_count());
    Json(ApiResponse::success(HealthResponse::from(report)))
}

/// Liveness check endpoint.
pub async fn liveness_check(State(state): State<AppState>) -> StatusCode {
    if state.health.is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Readiness check endpoint.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    if state.health.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint(State(state): State<AppState>) -> Result<String, StatusCode> {
    match &state.metrics_handle {
        Some(handle) => Ok(handle.render()),
        None => Err(StatusCode::NOT_FOUND),
    }
}
