//! Error types for the SIT ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition under which a ledger calculation or a review decision
//! is rejected.

use thiserror::Error;
use uuid::Uuid;

use crate::models::SitExtensionStatus;

/// The main error type for the SIT ledger.
///
/// All fallible operations in the crate return this error type. Every
/// variant is raised before any shipment state is touched, so a returned
/// error always means nothing was applied.
///
/// # Example
///
/// ```
/// use sit_ledger::error::SitError;
///
/// let error = SitError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum SitError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A SIT service item contained inconsistent dates.
    #[error("Invalid SIT service item '{service_item_id}': {message}")]
    InvalidServiceItem {
        /// The ID of the invalid service item.
        service_item_id: Uuid,
        /// A description of what made the service item invalid.
        message: String,
    },

    /// A decision or request was missing a field or had a bad value.
    #[error("Invalid field '{field}': {message}")]
    InvalidField {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An approval tried to lower the shipment's current allowance.
    #[error("Days approved ({days_approved}) cannot be less than the current allowance ({current_allowance})")]
    DaysApprovedBelowAllowance {
        /// The requested total allowance.
        days_approved: i64,
        /// The shipment's allowance before the decision.
        current_allowance: i64,
    },

    /// A day count was zero or negative where a positive count is required.
    #[error("Invalid day count for '{field}': {days}")]
    InvalidDayCount {
        /// The field carrying the day count.
        field: String,
        /// The rejected value.
        days: i64,
    },

    /// No extension with the given ID exists on the shipment.
    #[error("SIT extension not found: {extension_id}")]
    ExtensionNotFound {
        /// The extension ID that was not found.
        extension_id: Uuid,
    },

    /// The extension has already been approved or denied.
    #[error("SIT extension '{extension_id}' has already been decided ({status})")]
    ExtensionAlreadyDecided {
        /// The decided extension.
        extension_id: Uuid,
        /// Its terminal status.
        status: SitExtensionStatus,
    },

    /// The shipment already has an extension awaiting review.
    #[error("Shipment '{shipment_id}' already has a pending SIT extension")]
    PendingExtensionExists {
        /// The shipment with the pending extension.
        shipment_id: Uuid,
    },

    /// The operation needs a current SIT and the shipment has none.
    #[error("Shipment '{shipment_id}' has no current SIT")]
    NoCurrentSit {
        /// The shipment without a current SIT.
        shipment_id: Uuid,
    },

    /// A chosen authorization would end SIT before it started.
    #[error("The end date must occur after the start date. Please select a new date.")]
    EndDateBeforeStartDate,

    /// The shipment changed between computing a review outcome and applying it.
    #[error("Shipment '{shipment_id}' changed since the decision was computed: {message}")]
    StaleShipment {
        /// The shipment that changed.
        shipment_id: Uuid,
        /// What no longer matches.
        message: String,
    },

    /// Date arithmetic left the representable calendar range.
    #[error("Date out of range: {message}")]
    DateOutOfRange {
        /// A description of the failing arithmetic.
        message: String,
    },

    /// Conversion to customer expense was requested while not offered.
    #[error("Shipment '{shipment_id}' is not eligible for conversion to customer expense: {message}")]
    CustomerExpenseNotEligible {
        /// The shipment that is not eligible.
        shipment_id: Uuid,
        /// Which eligibility rule failed.
        message: String,
    },
}

/// A type alias for Results that return SitError.
pub type SitResult<T> = Result<T, SitError>;
