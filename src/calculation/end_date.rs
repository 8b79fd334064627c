//! SIT end date and allowance arithmetic.
//!
//! These helpers convert between an allowance in days and the last day of
//! storage it covers. End dates are inclusive: an allowance of one day ends
//! on the entry date.

use chrono::{Days, NaiveDate};

use crate::error::{SitError, SitResult};

/// Shifts a date by a signed number of days.
///
/// Returns `DateOutOfRange` instead of panicking when the result leaves
/// chrono's calendar.
pub fn add_days(date: NaiveDate, days: i64) -> SitResult<NaiveDate> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };

    shifted.ok_or_else(|| SitError::DateOutOfRange {
        message: format!("{} {:+} days", date, days),
    })
}

/// Turns an overflowed day count into `DateOutOfRange`.
pub(crate) fn checked_days(value: Option<i64>, what: &str) -> SitResult<i64> {
    value.ok_or_else(|| SitError::DateOutOfRange {
        message: format!("day count overflow computing {}", what),
    })
}

/// Returns the last day covered by `days` of storage starting on `entry_date`.
///
/// # Examples
///
/// ```
/// use sit_ledger::calculation::calculate_end_date;
/// use chrono::NaiveDate;
///
/// let entry = NaiveDate::from_ymd_opt(2021, 8, 13).unwrap();
/// let end = calculate_end_date(entry, 90).unwrap();
/// assert_eq!(end, NaiveDate::from_ymd_opt(2021, 11, 10).unwrap());
/// ```
pub fn calculate_end_date(entry_date: NaiveDate, days: i64) -> SitResult<NaiveDate> {
    let offset = checked_days(days.checked_sub(1), "end date")?;
    add_days(entry_date, offset)
}

/// Returns the total allowance implied by storing from `entry_date` through
/// `end_date`, on top of days already spent in earlier SIT.
///
/// # Examples
///
/// ```
/// use sit_ledger::calculation::calculate_sit_days_allowance;
/// use chrono::NaiveDate;
///
/// let entry = NaiveDate::from_ymd_opt(2021, 8, 13).unwrap();
/// let end = NaiveDate::from_ymd_opt(2021, 11, 10).unwrap();
/// assert_eq!(calculate_sit_days_allowance(entry, 30, end).unwrap(), 120);
/// ```
pub fn calculate_sit_days_allowance(
    entry_date: NaiveDate,
    days_in_previous_sit: i64,
    end_date: NaiveDate,
) -> SitResult<i64> {
    let span = (end_date - entry_date).num_days();
    checked_days(
        span.checked_add(1)
            .and_then(|days| days.checked_add(days_in_previous_sit)),
        "SIT days allowance",
    )
}

/// Returns the end date of the current SIT when the shipment's total
/// allowance is `days_approved` and `days_in_previous_sit` of it were
/// already used elsewhere.
///
/// The inverse of [`calculate_sit_days_allowance`]. A result before
/// `entry_date` means the allowance is already exhausted; callers that
/// need a valid authorization check for that.
pub fn calculate_sit_end_date(
    entry_date: NaiveDate,
    days_approved: i64,
    days_in_previous_sit: i64,
) -> SitResult<NaiveDate> {
    let remaining = checked_days(
        days_approved.checked_sub(days_in_previous_sit),
        "SIT end date",
    )?;
    calculate_end_date(entry_date, remaining)
}

/// Returns the last day the remaining allowance covers for the current SIT.
///
/// Once the current SIT has started the balance runs from today; for an
/// upcoming SIT it runs from the entry date. A negative balance yields a
/// date in the past.
pub fn calculate_allowance_end_date(
    sit_entry_date: NaiveDate,
    total_days_remaining: i64,
    today: NaiveDate,
) -> SitResult<NaiveDate> {
    if sit_entry_date < today {
        add_days(today, total_days_remaining)
    } else {
        add_days(sit_entry_date, total_days_remaining)
    }
}
