//! Office SIT authorization adjustment.
//!
//! Office users can set a shipment's allowance directly, up or down,
//! without a contractor request. The change is stored as an approved
//! extension carrying the signed difference.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculation::{calculate_sit_end_date, calculate_sit_status, checked_days};
use crate::error::{SitError, SitResult};
use crate::models::{AuditStep, Shipment, SitExtension, SitExtensionReason, SitExtensionStatus};

use super::{ExtensionChange, ReviewOutcome};

/// An office user's direct change to the SIT allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitAuthorizationAdjustment {
    /// The new total allowance.
    pub days_approved: i64,
    /// Why the allowance is changing.
    pub request_reason: SitExtensionReason,
    /// Office remarks. Required.
    #[serde(default)]
    pub office_remarks: Option<String>,
}

/// Computes an authorization adjustment for the shipment's current SIT.
///
/// The new allowance must leave the current SIT an end date on or after
/// its entry date, counting days already used in earlier SIT. The outcome
/// records an APPROVED extension whose `requested_days` and `approved_days`
/// are the signed change, and is applied with [`ReviewOutcome::apply`].
///
/// # Errors
///
/// - `InvalidDayCount` if `days_approved` is not positive
/// - `InvalidField` if office remarks are missing
/// - `NoCurrentSit` if the shipment has no current or upcoming SIT
/// - `EndDateBeforeStartDate` if the allowance is already used up by earlier SIT
pub fn adjust_sit_authorization(
    shipment: &Shipment,
    adjustment: &SitAuthorizationAdjustment,
    today: NaiveDate,
    decided_at: DateTime<Utc>,
) -> SitResult<ReviewOutcome> {
    let days_approved = adjustment.days_approved;
    if days_approved <= 0 {
        return Err(SitError::InvalidDayCount {
            field: "days_approved".to_string(),
            days: days_approved,
        });
    }

    let office_remarks = adjustment
        .office_remarks
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SitError::InvalidField {
            field: "office_remarks".to_string(),
            message: "required when adjusting SIT authorization".to_string(),
        })?;

    let no_current_sit = || SitError::NoCurrentSit {
        shipment_id: shipment.id,
    };
    let calculation = calculate_sit_status(shipment, today)?.ok_or_else(no_current_sit)?;
    let status = &calculation.sit_status;
    let current = status.current_sit.as_ref().ok_or_else(no_current_sit)?;

    let days_in_previous_sit = status.days_in_previous_sit();
    let sit_end_date =
        calculate_sit_end_date(current.sit_entry_date, days_approved, days_in_previous_sit)?;
    if sit_end_date < current.sit_entry_date {
        return Err(SitError::EndDateBeforeStartDate);
    }

    let previous_allowance = shipment.sit_days_allowance;
    let delta = checked_days(
        days_approved.checked_sub(previous_allowance),
        "allowance change",
    )?;

    let extension = SitExtension {
        id: Uuid::new_v4(),
        shipment_id: shipment.id,
        status: SitExtensionStatus::Approved,
        request_reason: adjustment.request_reason,
        requested_days: delta,
        contractor_remarks: None,
        approved_days: delta,
        office_remarks: Some(office_remarks),
        decision_date: Some(decided_at),
        created_at: Some(decided_at),
    };

    let audit_step = AuditStep {
        step_number: 1,
        rule_id: "sit_authorization_adjustment".to_string(),
        rule_name: "SIT Authorization Adjustment".to_string(),
        input: serde_json::json!({
            "days_approved": days_approved,
            "previous_allowance": previous_allowance,
            "sit_entry_date": current.sit_entry_date.to_string(),
            "days_in_previous_sit": days_in_previous_sit
        }),
        output: serde_json::json!({
            "sit_days_allowance": days_approved,
            "approved_days": delta,
            "sit_end_date": sit_end_date.to_string()
        }),
        reasoning: format!(
            "Allowance set from {} to {} ({:+} day(s)); current SIT ends {}",
            previous_allowance, days_approved, delta, sit_end_date
        ),
    };

    info!(
        shipment_id = %shipment.id,
        extension_id = %extension.id,
        previous_allowance,
        sit_days_allowance = days_approved,
        "SIT authorization adjusted"
    );

    Ok(ReviewOutcome {
        shipment_id: shipment.id,
        extension_change: ExtensionChange::Recorded(extension),
        previous_allowance,
        sit_days_allowance: days_approved,
        customer_expense: None,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SitLocation, SitServiceItem};

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn today() -> NaiveDate {
        make_date("2021-08-28")
    }

    /// 30 days at origin, then 15 days so far at destination.
    fn shipment_in_destination_sit(allowance: i64) -> Shipment {
        let mut shipment = Shipment::new(Uuid::new_v4(), allowance);
        shipment.sit_service_items = vec![
            SitServiceItem::new(Uuid::new_v4(), SitLocation::Origin, make_date("2021-07-14"))
                .departed(make_date("2021-08-13")),
            SitServiceItem::new(Uuid::new_v4(), SitLocation::Destination, make_date("2021-08-13")),
        ];
        shipment
    }

    fn adjustment(days_approved: i64) -> SitAuthorizationAdjustment {
        SitAuthorizationAdjustment {
            days_approved,
            request_reason: SitExtensionReason::AwaitingCompletionOfResidence,
            office_remarks: Some("residence under construction".to_string()),
        }
    }

    #[test]
    fn test_decrease_records_negative_delta() {
        let mut shipment = shipment_in_destination_sit(90);

        let outcome =
            adjust_sit_authorization(&shipment, &adjustment(80), today(), Utc::now()).unwrap();

        let extension = outcome.extension();
        assert_eq!(extension.status, SitExtensionStatus::Approved);
        assert_eq!(extension.approved_days, -10);
        assert_eq!(extension.requested_days, -10);
        assert_eq!(outcome.sit_days_allowance, 80);
        assert_eq!(outcome.audit_step.output["sit_end_date"], "2021-10-01");

        outcome.apply(&mut shipment).unwrap();
        assert_eq!(shipment.sit_days_allowance, 80);
        assert_eq!(shipment.sit_extensions.len(), 1);
    }

    #[test]
    fn test_increase_records_positive_delta() {
        let shipment = shipment_in_destination_sit(90);
        let outcome =
            adjust_sit_authorization(&shipment, &adjustment(120), today(), Utc::now()).unwrap();

        assert_eq!(outcome.extension().approved_days, 30);
        assert!(outcome.audit_step.reasoning.contains("+30"));
    }

    #[test]
    fn test_allowance_used_by_previous_sit_is_rejected() {
        let shipment = shipment_in_destination_sit(90);
        let result = adjust_sit_authorization(&shipment, &adjustment(1), today(), Utc::now());

        match result {
            Err(e @ SitError::EndDateBeforeStartDate) => assert_eq!(
                e.to_string(),
                "The end date must occur after the start date. Please select a new date."
            ),
            other => panic!("Expected EndDateBeforeStartDate, got {:?}", other),
        }
    }

    #[test]
    fn test_allowance_ending_on_entry_date_is_accepted() {
        let shipment = shipment_in_destination_sit(90);
        let outcome =
            adjust_sit_authorization(&shipment, &adjustment(31), today(), Utc::now()).unwrap();

        assert_eq!(outcome.audit_step.output["sit_end_date"], "2021-08-13");
    }

    #[test]
    fn test_without_current_sit_is_rejected() {
        let mut shipment = shipment_in_destination_sit(90);
        shipment.sit_service_items.truncate(1);

        let result = adjust_sit_authorization(&shipment, &adjustment(80), today(), Utc::now());
        assert!(matches!(result, Err(SitError::NoCurrentSit { .. })));

        let empty = Shipment::new(Uuid::new_v4(), 90);
        let result = adjust_sit_authorization(&empty, &adjustment(80), today(), Utc::now());
        assert!(matches!(result, Err(SitError::NoCurrentSit { .. })));
    }

    #[test]
    fn test_missing_remarks_are_rejected() {
        let shipment = shipment_in_destination_sit(90);
        let mut missing = adjustment(80);
        missing.office_remarks = None;

        let result = adjust_sit_authorization(&shipment, &missing, today(), Utc::now());
        assert!(matches!(result, Err(SitError::InvalidField { .. })));
    }

    #[test]
    fn test_negative_allowance_is_rejected() {
        let shipment = shipment_in_destination_sit(i64::MIN);
        let result = adjust_sit_authorization(&shipment, &adjustment(80), today(), Utc::now());

        assert!(matches!(
            result,
            Err(SitError::InvalidDayCount { days: i64::MIN, .. })
        ));
    }

    #[test]
    fn test_zero_days_are_rejected() {
        let shipment = shipment_in_destination_sit(90);
        let result = adjust_sit_authorization(&shipment, &adjustment(0), today(), Utc::now());

        assert!(matches!(result, Err(SitError::InvalidDayCount { days: 0, .. })));
    }
}
