//! Review outcomes and how they are applied to a shipment.
//!
//! Deciding and applying are separate steps. A [`ReviewOutcome`] is
//! computed from a shipment snapshot without touching it, and
//! [`ReviewOutcome::apply`] then writes the extension, the allowance and
//! any customer expense flag together, or nothing at all.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SitError, SitResult};
use crate::models::{AuditStep, Shipment, SitExtension};

/// A change to the customer expense flag of one SIT service item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerExpenseUpdate {
    /// The service item to update.
    pub service_item_id: Uuid,
    /// The new flag value.
    pub convert_to_customer_expense: bool,
    /// Office remarks stored with the flag.
    #[serde(default)]
    pub customer_expense_reason: Option<String>,
}

impl CustomerExpenseUpdate {
    fn check(&self, shipment: &Shipment) -> SitResult<()> {
        if shipment
            .sit_service_items
            .iter()
            .any(|item| item.id == self.service_item_id)
        {
            Ok(())
        } else {
            Err(SitError::StaleShipment {
                shipment_id: shipment.id,
                message: format!("SIT service item {} not found", self.service_item_id),
            })
        }
    }

    fn write(&self, shipment: &mut Shipment) {
        if let Some(item) = shipment.service_item_mut(self.service_item_id) {
            item.convert_to_customer_expense = self.convert_to_customer_expense;
            item.customer_expense_reason = self.customer_expense_reason.clone();
        }
    }

    /// Sets the flag on the shipment's service item.
    ///
    /// Returns `StaleShipment` if the item is no longer on the shipment.
    pub fn apply(&self, shipment: &mut Shipment) -> SitResult<()> {
        self.check(shipment)?;
        self.write(shipment);
        Ok(())
    }
}

/// How a review changes the shipment's extension history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "extension", rename_all = "snake_case")]
pub enum ExtensionChange {
    /// An existing pending extension was approved or denied.
    Decided(SitExtension),
    /// A new, already-approved extension records an office adjustment.
    Recorded(SitExtension),
}

impl ExtensionChange {
    /// Returns the extension as it will be stored.
    pub fn extension(&self) -> &SitExtension {
        match self {
            ExtensionChange::Decided(extension) | ExtensionChange::Recorded(extension) => extension,
        }
    }
}

/// The computed result of a review, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    /// The shipment the review was computed against.
    pub shipment_id: Uuid,
    /// The extension record to write.
    pub extension_change: ExtensionChange,
    /// The allowance the decision was computed against.
    pub previous_allowance: i64,
    /// The allowance after the decision.
    pub sit_days_allowance: i64,
    /// A customer expense flag change made with the decision.
    #[serde(default)]
    pub customer_expense: Option<CustomerExpenseUpdate>,
    /// The audit step recording the decision.
    pub audit_step: AuditStep,
}

impl ReviewOutcome {
    /// Returns the decided or recorded extension.
    pub fn extension(&self) -> &SitExtension {
        self.extension_change.extension()
    }

    /// Writes the outcome to the shipment as a single update.
    ///
    /// Every precondition is checked before anything is written: the
    /// shipment must be the one reviewed, its allowance must still be
    /// `previous_allowance`, a decided extension must still be pending, a
    /// recorded extension must not already exist, and any service item
    /// being converted must still be present. On error the shipment is
    /// left untouched.
    pub fn apply(&self, shipment: &mut Shipment) -> SitResult<()> {
        let stale = |message: String| SitError::StaleShipment {
            shipment_id: shipment.id,
            message,
        };

        if shipment.id != self.shipment_id {
            return Err(stale(format!(
                "outcome was computed for shipment {}",
                self.shipment_id
            )));
        }
        if shipment.sit_days_allowance != self.previous_allowance {
            return Err(stale(format!(
                "allowance is {} but the decision assumed {}",
                shipment.sit_days_allowance, self.previous_allowance
            )));
        }

        let extension = self.extension();
        let existing = shipment
            .sit_extensions
            .iter()
            .position(|e| e.id == extension.id);

        match (&self.extension_change, existing) {
            (ExtensionChange::Decided(_), None) => {
                return Err(SitError::ExtensionNotFound {
                    extension_id: extension.id,
                });
            }
            (ExtensionChange::Decided(_), Some(index)) => {
                let current = &shipment.sit_extensions[index];
                if !current.is_pending() {
                    return Err(SitError::ExtensionAlreadyDecided {
                        extension_id: current.id,
                        status: current.status,
                    });
                }
            }
            (ExtensionChange::Recorded(_), Some(_)) => {
                return Err(stale(format!("extension {} already exists", extension.id)));
            }
            (ExtensionChange::Recorded(_), None) => {}
        }

        if let Some(update) = &self.customer_expense {
            update.check(shipment)?;
        }

        match existing {
            Some(index) => shipment.sit_extensions[index] = extension.clone(),
            None => shipment.sit_extensions.push(extension.clone()),
        }
        shipment.sit_days_allowance = self.sit_days_allowance;
        if let Some(update) = &self.customer_expense {
            update.write(shipment);
        }

        Ok(())
    }
}
