//! Response types for the SIT ledger API.
//!
//! This module defines the success bodies returned by each endpoint and
//! the error response structures used for every failure.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SitError;
use crate::models::{AuditStep, Shipment, SitExtension, SitStatusCalculation};
use crate::review::{CustomerExpenseUpdate, ReviewOutcome};

/// Response body for `POST /sit-status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitStatusResponse {
    /// The ledger and its audit trace.
    #[serde(flatten)]
    pub calculation: SitStatusCalculation,
    /// Remaining days as displayed, or "Expired".
    pub days_remaining_label: String,
    /// Whether conversion to customer expense should be offered.
    pub show_convert_to_customer_expense: bool,
}

/// Response body for `POST /sit-end-date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitEndDateResponse {
    /// Entry date of the current SIT.
    pub sit_entry_date: NaiveDate,
    /// Days already used in earlier SIT.
    pub days_in_previous_sit: i64,
    /// The total allowance.
    pub days_approved: i64,
    /// The last day of storage the allowance covers.
    pub end_date: NaiveDate,
}

/// Response body for `POST /extensions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionResponse {
    /// The new pending extension.
    pub extension: SitExtension,
    /// The shipment with the extension added.
    pub shipment: Shipment,
}

/// Response body for `POST /extensions/review` and `POST /sit-authorization`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    /// The applied outcome.
    pub outcome: ReviewOutcome,
    /// The shipment after the outcome was applied.
    pub shipment: Shipment,
}

/// Response body for `POST /sit-customer-contact`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerContactResponse {
    /// The authorized end date set on the current SIT.
    pub sit_authorized_end_date: NaiveDate,
    /// The audit step recording how it was derived.
    pub audit_step: AuditStep,
    /// The shipment after the update.
    pub shipment: Shipment,
}

/// Response body for `POST /customer-expense`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerExpenseResponse {
    /// The applied flag change.
    pub update: CustomerExpenseUpdate,
    /// The shipment after the update.
    pub shipment: Shipment,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<SitError> for ApiErrorResponse {
    fn from(error: SitError) -> Self {
        let message = error.to_string();
        let (status, error) = match &error {
            SitError::ConfigNotFound { .. } | SitError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            SitError::InvalidServiceItem { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_SERVICE_ITEM",
                    message,
                    "The SIT service item dates are inconsistent",
                ),
            ),
            SitError::InvalidField { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "VALIDATION_ERROR",
                    message,
                    format!("Check the '{}' field", field),
                ),
            ),
            SitError::InvalidDayCount { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_DAY_COUNT",
                    message,
                    "Day counts must be greater than zero",
                ),
            ),
            SitError::DaysApprovedBelowAllowance { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("DAYS_APPROVED_BELOW_ALLOWANCE", message),
            ),
            SitError::ExtensionNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("EXTENSION_NOT_FOUND", message),
            ),
            SitError::ExtensionAlreadyDecided { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("EXTENSION_ALREADY_DECIDED", message),
            ),
            SitError::PendingExtensionExists { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("PENDING_EXTENSION_EXISTS", message),
            ),
            SitError::StaleShipment { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("STALE_SHIPMENT", message),
            ),
            SitError::NoCurrentSit { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("NO_CURRENT_SIT", message),
            ),
            SitError::EndDateBeforeStartDate => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("END_DATE_BEFORE_START_DATE", message),
            ),
            SitError::DateOutOfRange { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("DATE_OUT_OF_RANGE", message),
            ),
            SitError::CustomerExpenseNotEligible { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("CUSTOMER_EXPENSE_NOT_ELIGIBLE", message),
            ),
        };

        ApiErrorResponse { status, error }
    }
}
