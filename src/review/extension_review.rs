//! SIT extension review.
//!
//! Moves a pending extension to APPROVED or DENIED. The review itself is
//! pure: it returns a [`ReviewOutcome`] and leaves the shipment alone until
//! the caller applies it.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::calculation::{checked_days, sort_shipment_sits};
use crate::error::{SitError, SitResult};
use crate::models::{AuditStep, Shipment, SitExtensionStatus};

use super::{
    CustomerExpenseUpdate, ExtensionChange, ExtensionDecision, ReviewOutcome, ValidatedDecision,
};

/// Reviews a pending SIT extension.
///
/// On approval the extension's `approved_days` is the increase actually
/// granted (`days_approved - previous allowance`) and the shipment's
/// allowance becomes `days_approved`. On denial the allowance is unchanged,
/// `approved_days` stays zero, and the current SIT may be converted to
/// customer expense. The current SIT is the one in storage on `today`;
/// `decided_at` is stamped on the decided extension.
///
/// # Errors
///
/// - `InvalidDayCount` if the shipment's allowance is negative
/// - `ExtensionNotFound` if the shipment has no such extension
/// - `ExtensionAlreadyDecided` if it is not pending
/// - any validation error from [`ExtensionDecision::validate`]
/// - `NoCurrentSit` when a denial converts but there is no current SIT
///
/// # Examples
///
/// ```
/// use sit_ledger::models::{Shipment, SitExtension, SitExtensionReason, SitExtensionStatus};
/// use sit_ledger::review::{ExtensionDecision, review_extension};
/// use chrono::{NaiveDate, Utc};
/// use uuid::Uuid;
///
/// let mut shipment = Shipment::new(Uuid::new_v4(), 45);
/// let extension = SitExtension {
///     id: Uuid::new_v4(),
///     shipment_id: shipment.id,
///     status: SitExtensionStatus::Pending,
///     request_reason: SitExtensionReason::SeriousIllnessMember,
///     requested_days: 45,
///     contractor_remarks: None,
///     approved_days: 0,
///     office_remarks: None,
///     decision_date: None,
///     created_at: None,
/// };
/// shipment.sit_extensions.push(extension.clone());
///
/// let decision = ExtensionDecision {
///     accept: true,
///     days_approved: Some(90),
///     request_reason: SitExtensionReason::SeriousIllnessMember,
///     office_remarks: None,
///     convert_to_customer_expense: None,
/// };
/// let today = NaiveDate::from_ymd_opt(2021, 8, 28).unwrap();
/// let outcome =
///     review_extension(&shipment, extension.id, &decision, today, Utc::now()).unwrap();
/// assert_eq!(outcome.extension().approved_days, 45);
/// assert_eq!(outcome.sit_days_allowance, 90);
///
/// outcome.apply(&mut shipment).unwrap();
/// assert_eq!(shipment.sit_days_allowance, 90);
/// ```
pub fn review_extension(
    shipment: &Shipment,
    extension_id: Uuid,
    decision: &ExtensionDecision,
    today: NaiveDate,
    decided_at: DateTime<Utc>,
) -> SitResult<ReviewOutcome> {
    shipment.validate()?;

    let extension = shipment
        .extension(extension_id)
        .ok_or(SitError::ExtensionNotFound { extension_id })?;

    if extension.status.is_terminal() {
        return Err(SitError::ExtensionAlreadyDecided {
            extension_id,
            status: extension.status,
        });
    }

    let previous_allowance = shipment.sit_days_allowance;
    let validated = decision.validate(previous_allowance)?;

    let mut decided = extension.clone();
    decided.decision_date = Some(decided_at);

    let (sit_days_allowance, customer_expense) = match &validated {
        ValidatedDecision::Approve {
            days_approved,
            request_reason,
            office_remarks,
        } => {
            decided.status = SitExtensionStatus::Approved;
            decided.request_reason = *request_reason;
            decided.approved_days = checked_days(
                days_approved.checked_sub(previous_allowance),
                "approved days",
            )?;
            decided.office_remarks = office_remarks.clone();
            (*days_approved, None)
        }
        ValidatedDecision::Deny {
            request_reason,
            office_remarks,
            convert_to_customer_expense,
        } => {
            decided.status = SitExtensionStatus::Denied;
            decided.request_reason = *request_reason;
            decided.approved_days = 0;
            decided.office_remarks = Some(office_remarks.clone());

            let customer_expense = if *convert_to_customer_expense {
                let sorted = sort_shipment_sits(&shipment.sit_service_items, today);
                let current = sorted.current_sit().ok_or(SitError::NoCurrentSit {
                    shipment_id: shipment.id,
                })?;
                Some(CustomerExpenseUpdate {
                    service_item_id: current.id,
                    convert_to_customer_expense: true,
                    customer_expense_reason: Some(office_remarks.clone()),
                })
            } else {
                None
            };
            (previous_allowance, customer_expense)
        }
    };

    let audit_step = AuditStep {
        step_number: 1,
        rule_id: "extension_review".to_string(),
        rule_name: "SIT Extension Review".to_string(),
        input: serde_json::json!({
            "extension_id": extension_id.to_string(),
            "accept": decision.accept,
            "days_approved": decision.days_approved,
            "requested_days": extension.requested_days,
            "previous_allowance": previous_allowance,
            "convert_to_customer_expense": decision.convert_to_customer_expense
        }),
        output: serde_json::json!({
            "status": decided.status.to_string(),
            "approved_days": decided.approved_days,
            "sit_days_allowance": sit_days_allowance,
            "converted_service_item_id": customer_expense
                .as_ref()
                .map(|u: &CustomerExpenseUpdate| u.service_item_id.to_string())
        }),
        reasoning: match decided.status {
            SitExtensionStatus::Approved => format!(
                "Approved: allowance raised from {} to {} ({} day(s) granted)",
                previous_allowance, sit_days_allowance, decided.approved_days
            ),
            _ if customer_expense.is_some() => format!(
                "Denied: allowance stays {}; current SIT converted to customer expense",
                previous_allowance
            ),
            _ => format!("Denied: allowance stays {}", previous_allowance),
        },
    };

    info!(
        shipment_id = %shipment.id,
        extension_id = %extension_id,
        status = %decided.status,
        approved_days = decided.approved_days,
        sit_days_allowance,
        "SIT extension reviewed"
    );

    Ok(ReviewOutcome {
        shipment_id: shipment.id,
        extension_change: ExtensionChange::Decided(decided),
        previous_allowance,
        sit_days_allowance,
        customer_expense,
        audit_step,
    })
}
