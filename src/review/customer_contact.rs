//! Recording customer contact and requested delivery dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculation::{
    RequestedDatesEndDate, calculate_requested_dates_end_date, sort_shipment_sits,
};
use crate::error::{SitError, SitResult};
use crate::models::Shipment;

/// Dates reported by the contractor after speaking to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContactDates {
    /// When the customer contacted the contractor.
    #[serde(default)]
    pub sit_customer_contacted: Option<NaiveDate>,
    /// The delivery date the customer asked for.
    #[serde(default)]
    pub sit_requested_delivery: Option<NaiveDate>,
}

/// Stores customer dates on the current SIT and sets its authorized end date.
///
/// The end date follows [`calculate_requested_dates_end_date`]. Nothing is
/// written when it fails.
///
/// # Errors
///
/// - `InvalidServiceItem` if any item departs before it enters
/// - `NoCurrentSit` if the shipment has no current or upcoming SIT
/// - `InvalidField` if the date the location needs is missing
pub fn record_customer_contact(
    shipment: &mut Shipment,
    dates: &CustomerContactDates,
    today: NaiveDate,
    grace_period_days: i64,
) -> SitResult<RequestedDatesEndDate> {
    shipment.validate()?;

    let (service_item_id, result) = {
        let sorted = sort_shipment_sits(&shipment.sit_service_items, today);
        let current = sorted.current_sit().ok_or(SitError::NoCurrentSit {
            shipment_id: shipment.id,
        })?;
        let result = calculate_requested_dates_end_date(
            current.location,
            dates.sit_customer_contacted,
            dates.sit_requested_delivery,
            current.sit_departure_date,
            grace_period_days,
            1,
        )?;
        (current.id, result)
    };

    let shipment_id = shipment.id;
    let item = shipment
        .service_item_mut(service_item_id)
        .ok_or(SitError::NoCurrentSit { shipment_id })?;
    item.sit_customer_contacted = dates.sit_customer_contacted;
    item.sit_requested_delivery = dates.sit_requested_delivery;
    item.sit_authorized_end_date = Some(result.sit_authorized_end_date);

    info!(
        shipment_id = %shipment_id,
        service_item_id = %service_item_id,
        sit_authorized_end_date = %result.sit_authorized_end_date,
        "SIT customer contact recorded"
    );

    Ok(result)
}
