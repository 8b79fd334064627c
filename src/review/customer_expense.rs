//! Converting SIT to customer expense.
//!
//! Two ways in: [`CustomerExpenseToggle`] for the confirm-before-change
//! checkbox on the review form, and [`convert_to_customer_expense`] for the
//! standalone convert action offered near the end of the allowance.

use tracing::info;
use uuid::Uuid;

use crate::calculation::show_convert_to_customer_expense;
use crate::error::{SitError, SitResult};
use crate::models::{Shipment, SitServiceItem, SitStatus};

use super::CustomerExpenseUpdate;

/// A customer expense flag change awaiting explicit confirmation.
///
/// Proposing a value does not change anything. Confirming turns the
/// proposal into a [`CustomerExpenseUpdate`]; declining reverts to the
/// value the item had.
///
/// # Example
///
/// ```
/// use sit_ledger::models::{SitLocation, SitServiceItem};
/// use sit_ledger::review::CustomerExpenseToggle;
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let item = SitServiceItem::new(
///     Uuid::new_v4(),
///     SitLocation::Destination,
///     NaiveDate::from_ymd_opt(2021, 8, 13).unwrap(),
/// );
/// let mut toggle = CustomerExpenseToggle::new(&item);
///
/// toggle.propose(true);
/// assert!(toggle.awaiting_confirmation());
/// assert!(!toggle.decline());
/// assert!(!toggle.value());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerExpenseToggle {
    service_item_id: Uuid,
    current: bool,
    proposed: Option<bool>,
}

impl CustomerExpenseToggle {
    /// Starts a toggle from the item's stored flag.
    pub fn new(item: &SitServiceItem) -> Self {
        Self {
            service_item_id: item.id,
            current: item.convert_to_customer_expense,
            proposed: None,
        }
    }

    /// Proposes a new flag value. Replaces any earlier proposal.
    pub fn propose(&mut self, value: bool) {
        self.proposed = Some(value);
    }

    /// Returns true while a proposal waits for yes or no.
    pub fn awaiting_confirmation(&self) -> bool {
        self.proposed.is_some()
    }

    /// The confirmed flag value.
    pub fn value(&self) -> bool {
        self.current
    }

    /// Accepts the proposal.
    ///
    /// Returns `InvalidField` when nothing was proposed.
    pub fn confirm(&mut self, remarks: Option<String>) -> SitResult<CustomerExpenseUpdate> {
        let value = self.proposed.take().ok_or_else(|| SitError::InvalidField {
            field: "convert_to_customer_expense".to_string(),
            message: "no change awaiting confirmation".to_string(),
        })?;
        self.current = value;

        Ok(CustomerExpenseUpdate {
            service_item_id: self.service_item_id,
            convert_to_customer_expense: value,
            customer_expense_reason: remarks,
        })
    }

    /// Rejects the proposal and returns the value kept.
    pub fn decline(&mut self) -> bool {
        self.proposed = None;
        self.current
    }
}

/// Converts the current SIT to customer expense.
///
/// `status` may be calculated by this crate or supplied by the backend;
/// it is used as given. Conversion must be offered for it under the
/// `threshold_days` rule of [`show_convert_to_customer_expense`].
///
/// # Errors
///
/// - `InvalidField` if `remarks` is blank
/// - `CustomerExpenseNotEligible` naming the rules that blocked conversion
pub fn convert_to_customer_expense(
    shipment: &Shipment,
    status: &SitStatus,
    remarks: &str,
    threshold_days: i64,
) -> SitResult<CustomerExpenseUpdate> {
    let remarks = remarks.trim();
    if remarks.is_empty() {
        return Err(SitError::InvalidField {
            field: "remarks".to_string(),
            message: "required when converting to customer expense".to_string(),
        });
    }

    let eligibility =
        show_convert_to_customer_expense(status, shipment.has_pending_extension(), threshold_days, 1);

    let current = match &status.current_sit {
        Some(current) if eligibility.eligible => current,
        _ => {
            return Err(SitError::CustomerExpenseNotEligible {
                shipment_id: shipment.id,
                message: eligibility.blocked_by.join(", "),
            });
        }
    };

    info!(
        shipment_id = %shipment.id,
        service_item_id = %current.service_item_id,
        total_days_remaining = status.total_days_remaining,
        "SIT converted to customer expense"
    );

    Ok(CustomerExpenseUpdate {
        service_item_id: current.service_item_id,
        convert_to_customer_expense: true,
        customer_expense_reason: Some(remarks.to_string()),
    })
}
