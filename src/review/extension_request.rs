//! Contractor SIT extension requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{SitError, SitResult};
use crate::models::{Shipment, SitExtension, SitExtensionReason, SitExtensionStatus};

/// A contractor's request for more SIT days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRequest {
    /// Why the extra days are needed.
    pub request_reason: SitExtensionReason,
    /// How many extra days are asked for.
    pub requested_days: i64,
    /// Free-text remarks for the office.
    #[serde(default)]
    pub contractor_remarks: Option<String>,
}

/// Adds a pending extension to the shipment.
///
/// A shipment holds at most one pending extension, so a second request is
/// rejected until the first is decided. Returns the new extension.
///
/// # Errors
///
/// - `InvalidDayCount` if `requested_days` is not positive
/// - `PendingExtensionExists` if an extension already awaits review
pub fn submit_extension_request(
    shipment: &mut Shipment,
    request: &ExtensionRequest,
    created_at: DateTime<Utc>,
) -> SitResult<SitExtension> {
    if request.requested_days <= 0 {
        return Err(SitError::InvalidDayCount {
            field: "requested_days".to_string(),
            days: request.requested_days,
        });
    }
    if shipment.has_pending_extension() {
        return Err(SitError::PendingExtensionExists {
            shipment_id: shipment.id,
        });
    }

    let extension = SitExtension {
        id: Uuid::new_v4(),
        shipment_id: shipment.id,
        status: SitExtensionStatus::Pending,
        request_reason: request.request_reason,
        requested_days: request.requested_days,
        contractor_remarks: request
            .contractor_remarks
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        approved_days: 0,
        office_remarks: None,
        decision_date: None,
        created_at: Some(created_at),
    };
    shipment.sit_extensions.push(extension.clone());

    info!(
        shipment_id = %shipment.id,
        extension_id = %extension.id,
        requested_days = extension.requested_days,
        "SIT extension requested"
    );

    Ok(extension)
}
