//! Authorized end date from customer contact and requested delivery.
//!
//! Once the customer has been in touch, storage authorization ends a grace
//! period after the relevant date: the contact date for origin SIT, the
//! requested delivery date for destination SIT. Goods that already left
//! earlier end authorization on departure.

use chrono::NaiveDate;

use crate::error::{SitError, SitResult};
use crate::models::{AuditStep, SitLocation};

use super::add_days;

/// The result of the requested-dates calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct RequestedDatesEndDate {
    /// The authorized end date for the current SIT.
    pub sit_authorized_end_date: NaiveDate,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the authorized end date of the current SIT from customer dates.
///
/// # Arguments
///
/// * `location` - Where the current SIT is
/// * `sit_customer_contacted` - Required for origin SIT
/// * `sit_requested_delivery` - Required for destination SIT
/// * `sit_departure_date` - Wins when earlier than the grace-period date
/// * `grace_period_days` - Days added after the customer date
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns `InvalidField` when the date the location needs is missing, and
/// `DateOutOfRange` if adding the grace period overflows.
///
/// # Examples
///
/// ```
/// use sit_ledger::calculation::calculate_requested_dates_end_date;
/// use sit_ledger::models::SitLocation;
/// use chrono::NaiveDate;
///
/// let contacted = NaiveDate::from_ymd_opt(2021, 8, 26).unwrap();
/// let result = calculate_requested_dates_end_date(
///     SitLocation::Origin,
///     Some(contacted),
///     None,
///     None,
///     5,
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.sit_authorized_end_date, NaiveDate::from_ymd_opt(2021, 8, 31).unwrap());
/// ```
pub fn calculate_requested_dates_end_date(
    location: SitLocation,
    sit_customer_contacted: Option<NaiveDate>,
    sit_requested_delivery: Option<NaiveDate>,
    sit_departure_date: Option<NaiveDate>,
    grace_period_days: i64,
    step_number: u32,
) -> SitResult<RequestedDatesEndDate> {
    let (field, anchor) = match location {
        SitLocation::Origin => ("sit_customer_contacted", sit_customer_contacted),
        SitLocation::Destination => ("sit_requested_delivery", sit_requested_delivery),
    };
    let anchor = anchor.ok_or_else(|| SitError::InvalidField {
        field: field.to_string(),
        message: format!("required for {} SIT", location.as_str()),
    })?;

    let grace_end = add_days(anchor, grace_period_days)?;
    let sit_authorized_end_date = match sit_departure_date {
        Some(departure) if departure <= grace_end => departure,
        _ => grace_end,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "requested_dates_end_date".to_string(),
        rule_name: "Authorized End Date From Customer Dates".to_string(),
        input: serde_json::json!({
            "location": location.as_str(),
            field: anchor.to_string(),
            "sit_departure_date": sit_departure_date.map(|d| d.to_string()),
            "grace_period_days": grace_period_days
        }),
        output: serde_json::json!({
            "sit_authorized_end_date": sit_authorized_end_date.to_string()
        }),
        reasoning: if sit_authorized_end_date == grace_end {
            format!(
                "{} + {} grace day(s) = {}",
                anchor, grace_period_days, sit_authorized_end_date
            )
        } else {
            format!(
                "Departure {} is before {} + {} grace day(s); authorization ends on departure",
                sit_authorized_end_date, anchor, grace_period_days
            )
        },
    };

    Ok(RequestedDatesEndDate {
        sit_authorized_end_date,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_origin_uses_customer_contacted_plus_grace() {
        let result = calculate_requested_dates_end_date(
            SitLocation::Origin,
            Some(make_date("2021-08-26")),
            Some(make_date("2021-09-15")),
            None,
            5,
            1,
        )
        .unwrap();

        assert_eq!(result.sit_authorized_end_date, make_date("2021-08-31"));
        assert_eq!(result.audit_step.rule_id, "requested_dates_end_date");
    }

    #[test]
    fn test_destination_uses_requested_delivery_plus_grace() {
        let result = calculate_requested_dates_end_date(
            SitLocation::Destination,
            Some(make_date("2021-08-26")),
            Some(make_date("2021-09-15")),
            None,
            5,
            1,
        )
        .unwrap();

        assert_eq!(result.sit_authorized_end_date, make_date("2021-09-20"));
    }

    #[test]
    fn test_earlier_departure_wins() {
        let result = calculate_requested_dates_end_date(
            SitLocation::Origin,
            Some(make_date("2021-08-26")),
            None,
            Some(make_date("2021-08-29")),
            5,
            1,
        )
        .unwrap();

        assert_eq!(result.sit_authorized_end_date, make_date("2021-08-29"));
        assert!(result.audit_step.reasoning.contains("ends on departure"));
    }

    #[test]
    fn test_later_departure_is_ignored() {
        let result = calculate_requested_dates_end_date(
            SitLocation::Destination,
            None,
            Some(make_date("2021-09-15")),
            Some(make_date("2021-10-01")),
            5,
            1,
        )
        .unwrap();

        assert_eq!(result.sit_authorized_end_date, make_date("2021-09-20"));
    }

    #[test]
    fn test_origin_without_customer_contacted_is_rejected() {
        let result = calculate_requested_dates_end_date(
            SitLocation::Origin,
            None,
            Some(make_date("2021-09-15")),
            None,
            5,
            1,
        );

        match result {
            Err(SitError::InvalidField { field, .. }) => {
                assert_eq!(field, "sit_customer_contacted");
            }
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }
}
