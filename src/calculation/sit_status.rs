//! SIT status calculation.
//!
//! Builds the full day ledger for a shipment: days used, days remaining,
//! the current SIT summary and the past SIT history, with an audit trace
//! of every rule applied.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::SitResult;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, CurrentSit, Shipment, SitStatus, SitStatusCalculation,
};

use super::{
    calculate_allowance_end_date, calculate_total_days_used, checked_days, sort_shipment_sits,
};

/// Calculates the SIT status of a shipment as of `today`.
///
/// Returns `Ok(None)` when the shipment has no past, current or upcoming
/// SIT. Remaining days are `sit_days_allowance - total_sit_days_used` and
/// may be negative; they are never clamped.
///
/// # Errors
///
/// Returns `InvalidServiceItem` if any item departs before it enters,
/// `InvalidDayCount` if the allowance is negative, and `DateOutOfRange` if
/// the arithmetic leaves the calendar or overflows.
///
/// # Examples
///
/// ```
/// use sit_ledger::calculation::calculate_sit_status;
/// use sit_ledger::models::{Shipment, SitLocation, SitServiceItem};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let today = NaiveDate::from_ymd_opt(2021, 8, 28).unwrap();
/// let mut shipment = Shipment::new(Uuid::new_v4(), 90);
/// shipment.sit_service_items.push(SitServiceItem::new(
///     Uuid::new_v4(),
///     SitLocation::Origin,
///     NaiveDate::from_ymd_opt(2021, 8, 13).unwrap(),
/// ));
///
/// let result = calculate_sit_status(&shipment, today).unwrap().unwrap();
/// assert_eq!(result.sit_status.total_sit_days_used, 15);
/// assert_eq!(result.sit_status.total_days_remaining, 75);
/// ```
pub fn calculate_sit_status(
    shipment: &Shipment,
    today: NaiveDate,
) -> SitResult<Option<SitStatusCalculation>> {
    let start_time = Instant::now();

    shipment.validate()?;

    let sorted = sort_shipment_sits(&shipment.sit_service_items, today);
    let current = sorted.current_sit();

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    steps.push(AuditStep {
        step_number,
        rule_id: "sit_sort".to_string(),
        rule_name: "Sort SIT Service Items".to_string(),
        input: serde_json::json!({
            "today": today.to_string(),
            "item_count": shipment.sit_service_items.len()
        }),
        output: serde_json::json!({
            "past": sorted.past.len(),
            "current": sorted.current.len(),
            "future": sorted.future.len(),
            "current_sit_id": current.map(|item| item.id.to_string())
        }),
        reasoning: match current {
            Some(item) => format!(
                "Current SIT is the {} item entered {}",
                item.location.as_str(),
                item.sit_entry_date
            ),
            None => "No current or upcoming SIT".to_string(),
        },
    });
    step_number += 1;

    if sorted.past.is_empty() && current.is_none() {
        debug!(shipment_id = %shipment.id, "Shipment has no SIT");
        return Ok(None);
    }

    if sorted.current.len() > 1 {
        warnings.push(AuditWarning {
            code: "MULTIPLE_CURRENT_SITS".to_string(),
            message: format!(
                "{} SIT items are in storage at once; the earliest entered is reported as current",
                sorted.current.len()
            ),
            severity: "medium".to_string(),
        });
    }

    let days_used = calculate_total_days_used(&sorted, current, today, step_number);
    steps.push(days_used.audit_step);
    step_number += 1;

    let total_sit_days_used = days_used.total_sit_days_used;
    let total_days_remaining = checked_days(
        shipment.sit_days_allowance.checked_sub(total_sit_days_used),
        "days remaining",
    )?;

    steps.push(AuditStep {
        step_number,
        rule_id: "days_remaining".to_string(),
        rule_name: "SIT Days Remaining".to_string(),
        input: serde_json::json!({
            "sit_days_allowance": shipment.sit_days_allowance,
            "total_sit_days_used": total_sit_days_used
        }),
        output: serde_json::json!({
            "total_days_remaining": total_days_remaining
        }),
        reasoning: format!(
            "{} allowance - {} used = {} remaining",
            shipment.sit_days_allowance, total_sit_days_used, total_days_remaining
        ),
    });
    step_number += 1;

    if total_days_remaining <= 0 {
        warnings.push(AuditWarning {
            code: "SIT_EXPIRED".to_string(),
            message: format!(
                "SIT allowance is used up ({} day(s) remaining)",
                total_days_remaining
            ),
            severity: "high".to_string(),
        });
    }

    let current_sit = match current {
        Some(item) => {
            let sit_allowance_end_date =
                calculate_allowance_end_date(item.sit_entry_date, total_days_remaining, today)?;

            steps.push(AuditStep {
                step_number,
                rule_id: "allowance_end_date".to_string(),
                rule_name: "SIT Allowance End Date".to_string(),
                input: serde_json::json!({
                    "sit_entry_date": item.sit_entry_date.to_string(),
                    "total_days_remaining": total_days_remaining,
                    "today": today.to_string()
                }),
                output: serde_json::json!({
                    "sit_allowance_end_date": sit_allowance_end_date.to_string()
                }),
                reasoning: if item.sit_entry_date < today {
                    format!(
                        "SIT started {}; {} + {} day(s) = {}",
                        item.sit_entry_date, today, total_days_remaining, sit_allowance_end_date
                    )
                } else {
                    format!(
                        "SIT starts {}; entry + {} day(s) = {}",
                        item.sit_entry_date, total_days_remaining, sit_allowance_end_date
                    )
                },
            });

            Some(CurrentSit {
                service_item_id: item.id,
                location: item.location,
                days_in_sit: days_used.current_days_in_sit,
                sit_entry_date: item.sit_entry_date,
                sit_departure_date: item.sit_departure_date,
                sit_allowance_end_date,
                sit_authorized_end_date: item.sit_authorized_end_date,
                sit_customer_contacted: item.sit_customer_contacted,
                sit_requested_delivery: item.sit_requested_delivery,
                convert_to_customer_expense: item.convert_to_customer_expense,
            })
        }
        None => None,
    };

    let sit_status = SitStatus {
        total_sit_days_used,
        total_days_remaining,
        calculated_total_days_in_sit: total_sit_days_used,
        current_sit,
        past_sit_service_items: sorted.past.iter().map(|item| (*item).clone()).collect(),
    };

    let duration_us = start_time.elapsed().as_micros() as u64;

    Ok(Some(SitStatusCalculation {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        shipment_id: shipment.id,
        as_of: today,
        sit_days_allowance: shipment.sit_days_allowance,
        sit_status,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    }))
}

/// Calculates SIT status for several shipments, keyed by shipment ID.
///
/// Shipments without SIT are left out. A shipment whose status cannot be
/// calculated is logged and left out rather than failing the batch.
pub fn calculate_sit_statuses(
    shipments: &[Shipment],
    today: NaiveDate,
) -> HashMap<Uuid, SitStatusCalculation> {
    let mut statuses = HashMap::new();

    for shipment in shipments {
        match calculate_sit_status(shipment, today) {
            Ok(Some(calculation)) => {
                statuses.insert(shipment.id, calculation);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(shipment_id = %shipment.id, error = %e, "Skipping SIT status");
            }
        }
    }

    statuses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SitError;
    use crate::models::{SitLocation, SitServiceItem};

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn item(location: SitLocation, entry: &str) -> SitServiceItem {
        SitServiceItem::new(Uuid::new_v4(), location, make_date(entry))
    }

    fn shipment(allowance: i64, items: Vec<SitServiceItem>) -> Shipment {
        let mut shipment = Shipment::new(Uuid::new_v4(), allowance);
        shipment.sit_service_items = items;
        shipment
    }

    #[test]
    fn test_no_sit_returns_none() {
        let result = calculate_sit_status(&shipment(90, vec![]), make_date("2021-08-28")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_negative_allowance_is_rejected() {
        let extreme = shipment(i64::MIN, vec![item(SitLocation::Origin, "2021-08-13")]);
        let result = calculate_sit_status(&extreme, make_date("2021-08-28"));

        match result {
            Err(SitError::InvalidDayCount { field, days }) => {
                assert_eq!(field, "sit_days_allowance");
                assert_eq!(days, i64::MIN);
            }
            other => panic!("Expected InvalidDayCount, got {:?}", other),
        }
    }

    #[test]
    fn test_past_and_current_sit_ledger() {
        let today = make_date("2021-08-28");
        let past = item(SitLocation::Origin, "2021-07-14").departed(make_date("2021-08-13"));
        let current = item(SitLocation::Destination, "2021-08-13");
        let shipment = shipment(90, vec![past.clone(), current.clone()]);

        let result = calculate_sit_status(&shipment, today).unwrap().unwrap();
        let status = &result.sit_status;

        assert_eq!(status.total_sit_days_used, 45);
        assert_eq!(status.calculated_total_days_in_sit, 45);
        assert_eq!(status.total_days_remaining, 45);
        assert_eq!(status.past_sit_service_items, vec![past]);

        let current_sit = status.current_sit.as_ref().unwrap();
        assert_eq!(current_sit.service_item_id, current.id);
        assert_eq!(current_sit.days_in_sit, 15);
        assert_eq!(current_sit.sit_allowance_end_date, make_date("2021-10-12"));
        assert_eq!(status.days_in_previous_sit(), 30);
    }

    #[test]
    fn test_remaining_is_negative_when_overrun() {
        let today = make_date("2021-12-31");
        let shipment = shipment(90, vec![item(SitLocation::Origin, "2021-08-13")]);

        let result = calculate_sit_status(&shipment, today).unwrap().unwrap();
        assert_eq!(result.sit_status.total_sit_days_used, 140);
        assert_eq!(result.sit_status.total_days_remaining, -50);
        assert!(result.sit_status.is_expired());
        assert!(result.audit_trace.has_warning("SIT_EXPIRED"));
    }

    #[test]
    fn test_exactly_used_up_is_expired() {
        let today = make_date("2021-11-11");
        let shipment = shipment(90, vec![item(SitLocation::Origin, "2021-08-13")]);

        let result = calculate_sit_status(&shipment, today).unwrap().unwrap();
        assert_eq!(result.sit_status.total_days_remaining, 0);
        assert_eq!(result.sit_status.days_remaining_label(), "Expired");
    }

    #[test]
    fn test_upcoming_sit_is_reported_as_current() {
        let today = make_date("2021-08-28");
        let upcoming = item(SitLocation::Destination, "2021-09-02");
        let shipment = shipment(90, vec![upcoming.clone()]);

        let result = calculate_sit_status(&shipment, today).unwrap().unwrap();
        let current_sit = result.sit_status.current_sit.as_ref().unwrap();

        assert_eq!(current_sit.service_item_id, upcoming.id);
        assert_eq!(current_sit.days_in_sit, 0);
        assert_eq!(result.sit_status.total_sit_days_used, 0);
        assert_eq!(current_sit.sit_allowance_end_date, make_date("2021-12-01"));
    }

    #[test]
    fn test_only_past_sit_has_no_current() {
        let today = make_date("2021-08-28");
        let past = item(SitLocation::Origin, "2021-07-14").departed(make_date("2021-08-13"));
        let shipment = shipment(90, vec![past]);

        let result = calculate_sit_status(&shipment, today).unwrap().unwrap();
        assert!(result.sit_status.current_sit.is_none());
        assert_eq!(result.sit_status.total_days_remaining, 60);
        assert!(result.audit_trace.step("allowance_end_date").is_none());
    }

    #[test]
    fn test_multiple_current_sits_warns() {
        let today = make_date("2021-08-28");
        let shipment = shipment(
            90,
            vec![
                item(SitLocation::Origin, "2021-08-10"),
                item(SitLocation::Destination, "2021-08-20"),
            ],
        );

        let result = calculate_sit_status(&shipment, today).unwrap().unwrap();
        assert!(result.audit_trace.has_warning("MULTIPLE_CURRENT_SITS"));
        assert_eq!(result.sit_status.total_sit_days_used, 26);
    }

    #[test]
    fn test_invalid_item_is_rejected() {
        let bad = item(SitLocation::Origin, "2021-08-13").departed(make_date("2021-08-01"));
        let result = calculate_sit_status(&shipment(90, vec![bad]), make_date("2021-08-28"));

        assert!(matches!(result, Err(SitError::InvalidServiceItem { .. })));
    }

    #[test]
    fn test_audit_trace_records_steps_in_order() {
        let today = make_date("2021-08-28");
        let shipment = shipment(90, vec![item(SitLocation::Origin, "2021-08-13")]);

        let result = calculate_sit_status(&shipment, today).unwrap().unwrap();
        let rule_ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();

        assert_eq!(
            rule_ids,
            vec!["sit_sort", "total_days_used", "days_remaining", "allowance_end_date"]
        );
        for (i, step) in result.audit_trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
    }

    #[test]
    fn test_calculation_is_repeatable() {
        let today = make_date("2021-08-28");
        let shipment = shipment(90, vec![item(SitLocation::Origin, "2021-08-13")]);

        let first = calculate_sit_status(&shipment, today).unwrap().unwrap();
        let second = calculate_sit_status(&shipment, today).unwrap().unwrap();
        assert_eq!(first.sit_status, second.sit_status);
        assert_ne!(first.calculation_id, second.calculation_id);
    }

    #[test]
    fn test_batch_skips_shipments_without_sit() {
        let today = make_date("2021-08-28");
        let with_sit = shipment(90, vec![item(SitLocation::Origin, "2021-08-13")]);
        let without_sit = shipment(90, vec![]);
        let invalid = shipment(
            90,
            vec![item(SitLocation::Origin, "2021-08-13").departed(make_date("2021-08-01"))],
        );

        let statuses = calculate_sit_statuses(&[with_sit.clone(), without_sit, invalid], today);
        assert_eq!(statuses.len(), 1);
        assert!(statuses.contains_key(&with_sit.id));
    }
}
