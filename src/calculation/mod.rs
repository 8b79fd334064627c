//! Calculation logic for the SIT ledger.
//!
//! This module contains the pure SIT day accounting: sorting service items
//! into past, current and future, counting days used, converting between
//! allowances and end dates, the allowance from extension history, the
//! authorized end date from customer dates, and conversion-to-customer-expense
//! eligibility.

mod allowance;
mod customer_expense;
mod days_in_sit;
mod end_date;
mod requested_dates;
mod sit_sorting;
mod sit_status;

pub use allowance::{AllowanceResult, calculate_sit_allowance};
pub use customer_expense::{ConvertEligibility, show_convert_to_customer_expense};
pub use days_in_sit::{DaysUsedResult, calculate_total_days_used, days_in_sit};
pub use end_date::{
    add_days, calculate_allowance_end_date, calculate_end_date, calculate_sit_days_allowance,
    calculate_sit_end_date,
};
pub(crate) use end_date::checked_days;
pub use requested_dates::{RequestedDatesEndDate, calculate_requested_dates_end_date};
pub use sit_sorting::{SortedShipmentSits, sort_shipment_sits};
pub use sit_status::{calculate_sit_status, calculate_sit_statuses};
