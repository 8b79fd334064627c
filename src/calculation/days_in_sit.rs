//! Days-in-SIT counting.
//!
//! Counts how many days each SIT service item has used and totals them
//! across a shipment.

use chrono::NaiveDate;

use crate::models::{AuditStep, SitServiceItem};

use super::SortedShipmentSits;

/// The result of totalling SIT days across a shipment, including the audit step.
#[derive(Debug, Clone)]
pub struct DaysUsedResult {
    /// Days counted against the allowance by past and current items.
    pub total_sit_days_used: i64,
    /// Days used by the current SIT alone. Zero when it has not started.
    pub current_days_in_sit: i64,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Counts the days a single SIT service item has used as of `today`.
///
/// An item the goods left before today counts departure minus entry. An
/// item still in storage counts today minus entry. An item that has not
/// started yet counts nothing.
///
/// # Examples
///
/// ```
/// use sit_ledger::calculation::days_in_sit;
/// use sit_ledger::models::{SitLocation, SitServiceItem};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let today = NaiveDate::from_ymd_opt(2021, 8, 28).unwrap();
/// let item = SitServiceItem::new(
///     Uuid::new_v4(),
///     SitLocation::Origin,
///     NaiveDate::from_ymd_opt(2021, 8, 13).unwrap(),
/// );
/// assert_eq!(days_in_sit(&item, today), 15);
/// ```
pub fn days_in_sit(item: &SitServiceItem, today: NaiveDate) -> i64 {
    match item.sit_departure_date {
        Some(departure) if departure < today => (departure - item.sit_entry_date).num_days(),
        _ if item.sit_entry_date < today => (today - item.sit_entry_date).num_days(),
        _ => 0,
    }
}

/// Totals the days used by a shipment's past and current SIT.
///
/// Future items contribute nothing. The total is not clamped to the
/// allowance; overruns show up as a negative remaining balance.
///
/// # Arguments
///
/// * `sorted` - The shipment's SIT items, sorted relative to `today`
/// * `current` - The item reported as the current SIT, if any
/// * `today` - The day the ledger is evaluated on
/// * `step_number` - The step number for audit trail sequencing
pub fn calculate_total_days_used(
    sorted: &SortedShipmentSits<'_>,
    current: Option<&SitServiceItem>,
    today: NaiveDate,
    step_number: u32,
) -> DaysUsedResult {
    let per_item: Vec<(&SitServiceItem, i64)> = sorted
        .past
        .iter()
        .chain(sorted.current.iter())
        .map(|item| (*item, days_in_sit(item, today)))
        .collect();

    let total_sit_days_used: i64 = per_item.iter().map(|(_, days)| days).sum();
    let current_days_in_sit = current.map_or(0, |item| days_in_sit(item, today));

    let audit_step = AuditStep {
        step_number,
        rule_id: "total_days_used".to_string(),
        rule_name: "Total SIT Days Used".to_string(),
        input: serde_json::json!({
            "today": today.to_string(),
            "items": per_item
                .iter()
                .map(|(item, days)| serde_json::json!({
                    "service_item_id": item.id.to_string(),
                    "location": item.location.as_str(),
                    "sit_entry_date": item.sit_entry_date.to_string(),
                    "sit_departure_date": item.sit_departure_date.map(|d| d.to_string()),
                    "days_in_sit": days
                }))
                .collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "total_sit_days_used": total_sit_days_used,
            "current_days_in_sit": current_days_in_sit
        }),
        reasoning: format!(
            "{} day(s) used across {} past and {} current SIT item(s)",
            total_sit_days_used,
            sorted.past.len(),
            sorted.current.len()
        ),
    };

    DaysUsedResult {
        total_sit_days_used,
        current_days_in_sit,
        audit_step,
    }
}
