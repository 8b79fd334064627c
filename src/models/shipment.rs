//! Shipment model.
//!
//! Only the parts of a shipment the SIT ledger reads or writes are modelled:
//! the allowance, the SIT service items and the extension history.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SitError, SitResult};

use super::{SitExtension, SitServiceItem};

/// A shipment snapshot as supplied by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    /// Unique identifier for the shipment.
    pub id: Uuid,
    /// Total days of SIT authorized for the shipment.
    pub sit_days_allowance: i64,
    /// Every SIT service item recorded against the shipment.
    #[serde(default)]
    pub sit_service_items: Vec<SitServiceItem>,
    /// Every extension request, decided or not.
    #[serde(default)]
    pub sit_extensions: Vec<SitExtension>,
}

impl Shipment {
    /// Creates a shipment with an allowance and no SIT history.
    pub fn new(id: Uuid, sit_days_allowance: i64) -> Self {
        Self {
            id,
            sit_days_allowance,
            sit_service_items: Vec::new(),
            sit_extensions: Vec::new(),
        }
    }

    /// Rejects a negative allowance and any inconsistent service item.
    pub fn validate(&self) -> SitResult<()> {
        if self.sit_days_allowance < 0 {
            return Err(SitError::InvalidDayCount {
                field: "sit_days_allowance".to_string(),
                days: self.sit_days_allowance,
            });
        }
        self.sit_service_items
            .iter()
            .try_for_each(SitServiceItem::validate)
    }

    /// Returns the extension awaiting review, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use sit_ledger::models::Shipment;
    /// use uuid::Uuid;
    ///
    /// let shipment = Shipment::new(Uuid::new_v4(), 90);
    /// assert!(shipment.pending_extension().is_none());
    /// assert!(!shipment.has_pending_extension());
    /// ```
    pub fn pending_extension(&self) -> Option<&SitExtension> {
        self.sit_extensions.iter().find(|e| e.is_pending())
    }

    /// Returns true if an extension is awaiting review.
    pub fn has_pending_extension(&self) -> bool {
        self.pending_extension().is_some()
    }

    /// Looks up an extension by ID.
    pub fn extension(&self, extension_id: Uuid) -> Option<&SitExtension> {
        self.sit_extensions.iter().find(|e| e.id == extension_id)
    }

    /// Looks up a SIT service item by ID for mutation.
    pub fn service_item_mut(&mut self, service_item_id: Uuid) -> Option<&mut SitServiceItem> {
        self.sit_service_items
            .iter_mut()
            .find(|item| item.id == service_item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SitExtensionReason, SitExtensionStatus};

    fn extension(status: SitExtensionStatus) -> SitExtension {
        SitExtension {
            id: Uuid::new_v4(),
            shipment_id: Uuid::nil(),
            status,
            request_reason: SitExtensionReason::Other,
            requested_days: 30,
            contractor_remarks: None,
            approved_days: 0,
            office_remarks: None,
            decision_date: None,
            created_at: None,
        }
    }

    #[test]
    fn test_pending_extension_ignores_decided() {
        let mut shipment = Shipment::new(Uuid::nil(), 90);
        shipment
            .sit_extensions
            .push(extension(SitExtensionStatus::Approved));
        shipment.sit_extensions.push(extension(SitExtensionStatus::Denied));
        assert!(!shipment.has_pending_extension());

        let pending = extension(SitExtensionStatus::Pending);
        let pending_id = pending.id;
        shipment.sit_extensions.push(pending);
        assert_eq!(shipment.pending_extension().map(|e| e.id), Some(pending_id));
    }

    #[test]
    fn test_validate_rejects_negative_allowance() {
        let shipment = Shipment::new(Uuid::nil(), i64::MIN);
        assert!(matches!(
            shipment.validate(),
            Err(SitError::InvalidDayCount { days: i64::MIN, .. })
        ));
        assert!(Shipment::new(Uuid::nil(), 0).validate().is_ok());
    }

    #[test]
    fn test_deserialize_without_history() {
        let json = r#"{
            "id": "f39ba92d-7d42-446a-be70-3a97b5f9f081",
            "sit_days_allowance": 270
        }"#;

        let shipment: Shipment = serde_json::from_str(json).unwrap();
        assert_eq!(shipment.sit_days_allowance, 270);
        assert!(shipment.sit_service_items.is_empty());
        assert!(shipment.sit_extensions.is_empty());
    }
}
