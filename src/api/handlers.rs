//! HTTP request handlers for the SIT ledger API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    calculate_sit_days_allowance, calculate_sit_end_date, calculate_sit_status,
    show_convert_to_customer_expense,
};
use crate::error::{SitError, SitResult};
use crate::models::Shipment;
use crate::review::{
    adjust_sit_authorization, convert_to_customer_expense, record_customer_contact,
    review_extension, submit_extension_request,
};

use super::request::{
    AdjustAuthorizationRequest, ConvertToCustomerExpenseRequest, CustomerContactRequest,
    ReviewExtensionRequest, SitEndDateRequest, SitStatusRequest, SubmitExtensionRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, CustomerContactResponse, CustomerExpenseResponse,
    ExtensionResponse, ReviewResponse, SitEndDateResponse, SitStatusResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/sit-status", post(sit_status_handler))
        .route("/sit-end-date", post(sit_end_date_handler))
        .route("/extensions", post(submit_extension_handler))
        .route("/extensions/review", post(review_extension_handler))
        .route("/sit-authorization", post(adjust_authorization_handler))
        .route("/sit-customer-contact", post(customer_contact_handler))
        .route("/customer-expense", post(customer_expense_handler))
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

fn error_response(correlation_id: Uuid, err: SitError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request rejected"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn today_or_now(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Utc::now().date_naive())
}

/// Handler for POST /sit-status.
///
/// Returns the shipment's SIT ledger, or 204 when it has no SIT.
async fn sit_status_handler(
    State(state): State<AppState>,
    payload: Result<Json<SitStatusRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing SIT status request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let today = today_or_now(request.today);
    let shipment: Shipment = request.shipment.into();

    let start_time = Instant::now();
    match calculate_sit_status(&shipment, today) {
        Ok(Some(calculation)) => {
            let eligibility = show_convert_to_customer_expense(
                &calculation.sit_status,
                shipment.has_pending_extension(),
                state.customer_expense_threshold_days(),
                calculation.audit_trace.steps.len() as u32 + 1,
            );
            let mut calculation = calculation;
            calculation.audit_trace.steps.push(eligibility.audit_step);

            info!(
                correlation_id = %correlation_id,
                shipment_id = %shipment.id,
                total_sit_days_used = calculation.sit_status.total_sit_days_used,
                total_days_remaining = calculation.sit_status.total_days_remaining,
                duration_us = start_time.elapsed().as_micros(),
                "SIT status calculated"
            );

            let days_remaining_label = calculation.sit_status.days_remaining_label();
            json_response(
                StatusCode::OK,
                SitStatusResponse {
                    calculation,
                    days_remaining_label,
                    show_convert_to_customer_expense: eligibility.eligible,
                },
            )
        }
        Ok(None) => {
            info!(
                correlation_id = %correlation_id,
                shipment_id = %shipment.id,
                "Shipment has no SIT"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn resolve_end_date(request: &SitEndDateRequest) -> SitResult<SitEndDateResponse> {
    if request.days_in_previous_sit < 0 {
        return Err(SitError::InvalidDayCount {
            field: "days_in_previous_sit".to_string(),
            days: request.days_in_previous_sit,
        });
    }

    let (days_approved, end_date) = match (request.days_approved, request.end_date) {
        (Some(days_approved), None) => {
            if days_approved <= 0 {
                return Err(SitError::InvalidDayCount {
                    field: "days_approved".to_string(),
                    days: days_approved,
                });
            }
            let end_date = calculate_sit_end_date(
                request.sit_entry_date,
                days_approved,
                request.days_in_previous_sit,
            )?;
            (days_approved, end_date)
        }
        (None, Some(end_date)) => {
            let days_approved = calculate_sit_days_allowance(
                request.sit_entry_date,
                request.days_in_previous_sit,
                end_date,
            )?;
            (days_approved, end_date)
        }
        _ => {
            return Err(SitError::InvalidField {
                field: "days_approved".to_string(),
                message: "provide exactly one of days_approved and end_date".to_string(),
            });
        }
    };

    if end_date < request.sit_entry_date {
        return Err(SitError::EndDateBeforeStartDate);
    }

    Ok(SitEndDateResponse {
        sit_entry_date: request.sit_entry_date,
        days_in_previous_sit: request.days_in_previous_sit,
        days_approved,
        end_date,
    })
}

/// Handler for POST /sit-end-date.
///
/// Converts a proposed allowance to an end date or the reverse.
async fn sit_end_date_handler(payload: Result<Json<SitEndDateRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing SIT end date request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match resolve_end_date(&request) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /extensions.
async fn submit_extension_handler(
    payload: Result<Json<SubmitExtensionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing SIT extension request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let mut shipment: Shipment = request.shipment.into();
    match submit_extension_request(&mut shipment, &request.request, Utc::now()) {
        Ok(extension) => json_response(
            StatusCode::CREATED,
            ExtensionResponse {
                extension,
                shipment,
            },
        ),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /extensions/review.
async fn review_extension_handler(
    payload: Result<Json<ReviewExtensionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing SIT extension review");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let today = today_or_now(request.today);
    let mut shipment: Shipment = request.shipment.into();
    let result = review_extension(
        &shipment,
        request.extension_id,
        &request.decision,
        today,
        Utc::now(),
    )
    .and_then(|outcome| {
        outcome.apply(&mut shipment)?;
        Ok(outcome)
    });

    match result {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                shipment_id = %shipment.id,
                extension_id = %request.extension_id,
                status = %outcome.extension().status,
                "SIT extension decided"
            );
            json_response(StatusCode::OK, ReviewResponse { outcome, shipment })
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /sit-authorization.
async fn adjust_authorization_handler(
    payload: Result<Json<AdjustAuthorizationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing SIT authorization adjustment");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let today = today_or_now(request.today);
    let mut shipment: Shipment = request.shipment.into();
    let result = adjust_sit_authorization(&shipment, &request.adjustment, today, Utc::now())
        .and_then(|outcome| {
            outcome.apply(&mut shipment)?;
            Ok(outcome)
        });

    match result {
        Ok(outcome) => json_response(StatusCode::OK, ReviewResponse { outcome, shipment }),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /sit-customer-contact.
async fn customer_contact_handler(
    State(state): State<AppState>,
    payload: Result<Json<CustomerContactRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing SIT customer contact");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let today = today_or_now(request.today);
    let mut shipment: Shipment = request.shipment.into();
    match record_customer_contact(
        &mut shipment,
        &request.dates,
        today,
        state.grace_period_days(),
    ) {
        Ok(result) => json_response(
            StatusCode::OK,
            CustomerContactResponse {
                sit_authorized_end_date: result.sit_authorized_end_date,
                audit_step: result.audit_step,
                shipment,
            },
        ),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /customer-expense.
///
/// Uses the backend's SIT status when one is supplied.
async fn customer_expense_handler(
    State(state): State<AppState>,
    payload: Result<Json<ConvertToCustomerExpenseRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing convert to customer expense");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let today = today_or_now(request.today);
    let mut shipment: Shipment = request.shipment.into();
    let threshold_days = state.customer_expense_threshold_days();

    let status = match request.sit_status {
        Some(status) => Ok(status),
        None => calculate_sit_status(&shipment, today).and_then(|calculation| {
            calculation
                .map(|c| c.sit_status)
                .ok_or(SitError::NoCurrentSit {
                    shipment_id: shipment.id,
                })
        }),
    };

    let result = status
        .and_then(|status| {
            convert_to_customer_expense(&shipment, &status, &request.remarks, threshold_days)
        })
        .and_then(|update| {
            update.apply(&mut shipment)?;
            Ok(update)
        });

    match result {
        Ok(update) => json_response(StatusCode::OK, CustomerExpenseResponse { update, shipment }),
        Err(err) => error_response(correlation_id, err),
    }
}
