//! Request types for the SIT ledger API.
//!
//! This module defines the JSON request structures for every endpoint.
//! Each request carries the shipment snapshot it operates on; the service
//! keeps no shipment state between requests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Shipment, SitExtension, SitServiceItem, SitStatus};
use crate::review::{
    CustomerContactDates, ExtensionDecision, ExtensionRequest, SitAuthorizationAdjustment,
};

/// A shipment snapshot in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRequest {
    /// Unique identifier for the shipment.
    pub id: Uuid,
    /// Total days of SIT authorized for the shipment.
    pub sit_days_allowance: i64,
    /// Every SIT service item on the shipment.
    #[serde(default)]
    pub sit_service_items: Vec<SitServiceItem>,
    /// Every extension on the shipment.
    #[serde(default)]
    pub sit_extensions: Vec<SitExtension>,
}

impl From<ShipmentRequest> for Shipment {
    fn from(req: ShipmentRequest) -> Self {
        Shipment {
            id: req.id,
            sit_days_allowance: req.sit_days_allowance,
            sit_service_items: req.sit_service_items,
            sit_extensions: req.sit_extensions,
        }
    }
}

/// Request body for `POST /sit-status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitStatusRequest {
    /// The shipment to calculate.
    pub shipment: ShipmentRequest,
    /// The day to evaluate on. Defaults to the current UTC date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for `POST /sit-end-date`.
///
/// Exactly one of `days_approved` and `end_date` must be given; the
/// response fills in the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitEndDateRequest {
    /// Entry date of the current SIT.
    pub sit_entry_date: NaiveDate,
    /// Days already used in earlier SIT.
    #[serde(default)]
    pub days_in_previous_sit: i64,
    /// A proposed total allowance.
    #[serde(default)]
    pub days_approved: Option<i64>,
    /// A proposed end date for the current SIT.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Request body for `POST /extensions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitExtensionRequest {
    /// The shipment to add the extension to.
    pub shipment: ShipmentRequest,
    /// The contractor's request.
    pub request: ExtensionRequest,
}

/// Request body for `POST /extensions/review`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewExtensionRequest {
    /// The shipment holding the extension.
    pub shipment: ShipmentRequest,
    /// The extension being decided.
    pub extension_id: Uuid,
    /// The office decision.
    pub decision: ExtensionDecision,
    /// Date used to find the current SIT when a denial converts it.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for `POST /sit-authorization`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustAuthorizationRequest {
    /// The shipment to adjust.
    pub shipment: ShipmentRequest,
    /// The new allowance and its justification.
    pub adjustment: SitAuthorizationAdjustment,
    /// The day to evaluate the current SIT on. Defaults to the current UTC date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for `POST /sit-customer-contact`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerContactRequest {
    /// The shipment whose current SIT is updated.
    pub shipment: ShipmentRequest,
    /// The customer dates.
    #[serde(flatten)]
    pub dates: CustomerContactDates,
    /// The day to evaluate the current SIT on. Defaults to the current UTC date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for `POST /customer-expense`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertToCustomerExpenseRequest {
    /// The shipment whose current SIT is converted.
    pub shipment: ShipmentRequest,
    /// Backend-computed SIT status. Calculated from the shipment when absent.
    #[serde(default)]
    pub sit_status: Option<SitStatus>,
    /// Office remarks explaining the conversion.
    pub remarks: String,
    /// The day to evaluate on when calculating. Defaults to the current UTC date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}
