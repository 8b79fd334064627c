//! SIT status models.
//!
//! This module contains the derived [`SitStatus`] day ledger, the
//! [`CurrentSit`] summary of the active storage event, and the
//! [`SitStatusCalculation`] envelope that pairs a ledger with its audit trace.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditTrace, SitLocation, SitServiceItem};

/// Label shown in place of a non-positive remaining balance.
pub const EXPIRED_LABEL: &str = "Expired";

/// Summary of the SIT event that is active now or starts next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSit {
    /// The service item this summary was built from.
    pub service_item_id: Uuid,
    /// Origin or destination storage.
    pub location: SitLocation,
    /// Days spent at this location so far.
    pub days_in_sit: i64,
    /// The first day in storage.
    pub sit_entry_date: NaiveDate,
    /// The departure date, once set.
    #[serde(default)]
    pub sit_departure_date: Option<NaiveDate>,
    /// The last day covered by the remaining allowance.
    pub sit_allowance_end_date: NaiveDate,
    /// Authorized end date as recorded by the backend.
    #[serde(default)]
    pub sit_authorized_end_date: Option<NaiveDate>,
    /// When the customer contacted the contractor about delivery.
    #[serde(default)]
    pub sit_customer_contacted: Option<NaiveDate>,
    /// The delivery date the customer asked for.
    #[serde(default)]
    pub sit_requested_delivery: Option<NaiveDate>,
    /// Whether this storage is already billed to the customer.
    #[serde(default)]
    pub convert_to_customer_expense: bool,
}

/// The day ledger for a shipment's SIT.
///
/// Values may come from this crate's calculator or be supplied by the
/// backend; both deserialize into the same shape.
///
/// # Example
///
/// ```
/// use sit_ledger::models::SitStatus;
///
/// let status = SitStatus {
///     total_sit_days_used: 270,
///     total_days_remaining: -2,
///     calculated_total_days_in_sit: 270,
///     current_sit: None,
///     past_sit_service_items: vec![],
/// };
/// assert!(status.is_expired());
/// assert_eq!(status.days_remaining_label(), "Expired");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitStatus {
    /// Days of SIT counted against the allowance.
    pub total_sit_days_used: i64,
    /// Allowance minus days used. Negative once the allowance is overrun.
    pub total_days_remaining: i64,
    /// Raw total of days spent in SIT across all locations.
    pub calculated_total_days_in_sit: i64,
    /// The active or next storage event.
    #[serde(default)]
    pub current_sit: Option<CurrentSit>,
    /// Storage events the goods have already left.
    #[serde(default)]
    pub past_sit_service_items: Vec<SitServiceItem>,
}

impl SitStatus {
    /// Returns true when no allowance days remain.
    pub fn is_expired(&self) -> bool {
        self.total_days_remaining <= 0
    }

    /// Returns the remaining balance as shown to users.
    ///
    /// ```
    /// use sit_ledger::models::SitStatus;
    ///
    /// let status = SitStatus {
    ///     total_sit_days_used: 45,
    ///     total_days_remaining: 60,
    ///     calculated_total_days_in_sit: 45,
    ///     current_sit: None,
    ///     past_sit_service_items: vec![],
    /// };
    /// assert_eq!(status.days_remaining_label(), "60");
    /// ```
    pub fn days_remaining_label(&self) -> String {
        if self.is_expired() {
            EXPIRED_LABEL.to_string()
        } else {
            self.total_days_remaining.to_string()
        }
    }

    /// Days spent in storage before the current SIT began.
    pub fn days_in_previous_sit(&self) -> i64 {
        let current = self.current_sit.as_ref().map_or(0, |c| c.days_in_sit);
        self.calculated_total_days_in_sit - current
    }
}

/// The complete result of a SIT status calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitStatusCalculation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced the result.
    pub engine_version: String,
    /// The shipment the ledger describes.
    pub shipment_id: Uuid,
    /// The date the ledger was evaluated on.
    pub as_of: NaiveDate,
    /// The shipment's allowance at calculation time.
    pub sit_days_allowance: i64,
    /// The computed ledger.
    pub sit_status: SitStatus,
    /// Every rule applied, in order.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(remaining: i64) -> SitStatus {
        SitStatus {
            total_sit_days_used: 90,
            total_days_remaining: remaining,
            calculated_total_days_in_sit: 90,
            current_sit: None,
            past_sit_service_items: vec![],
        }
    }

    #[test]
    fn test_zero_remaining_is_expired() {
        assert!(status(0).is_expired());
        assert_eq!(status(0).days_remaining_label(), "Expired");
    }

    #[test]
    fn test_positive_remaining_is_not_expired() {
        assert!(!status(1).is_expired());
        assert_eq!(status(1).days_remaining_label(), "1");
    }

    #[test]
    fn test_deserialize_backend_status_with_current_sit() {
        let json = r#"{
            "total_sit_days_used": 45,
            "total_days_remaining": 60,
            "calculated_total_days_in_sit": 45,
            "current_sit": {
                "service_item_id": "eb3a1983-4961-4be2-bfb6-73ad1720418a",
                "location": "ORIGIN",
                "days_in_sit": 15,
                "sit_entry_date": "2021-08-13",
                "sit_allowance_end_date": "2021-10-12",
                "sit_authorized_end_date": "2021-08-28",
                "sit_customer_contacted": "2021-08-26",
                "sit_requested_delivery": "2021-08-30"
            }
        }"#;

        let status: SitStatus = serde_json::from_str(json).unwrap();
        let current = status.current_sit.as_ref().unwrap();
        assert_eq!(current.location, SitLocation::Origin);
        assert_eq!(current.days_in_sit, 15);
        assert!(!current.convert_to_customer_expense);
        assert!(status.past_sit_service_items.is_empty());
        assert_eq!(status.days_in_previous_sit(), 30);
    }
}
