//! SIT service item model and related types.
//!
//! This module defines the [`SitServiceItem`] struct and [`SitLocation`] enum
//! for representing a single storage event at origin or destination.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SitError, SitResult};

/// Where the goods are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SitLocation {
    /// Storage near the pickup address, before the line haul.
    Origin,
    /// Storage near the delivery address, after the line haul.
    Destination,
}

impl SitLocation {
    /// Returns the wire spelling of the location.
    pub fn as_str(&self) -> &'static str {
        match self {
            SitLocation::Origin => "ORIGIN",
            SitLocation::Destination => "DESTINATION",
        }
    }
}

/// A historical or current storage event for a shipment.
///
/// Items with a departure date in the past are immutable history. The
/// active item has no departure date until the goods leave storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitServiceItem {
    /// Unique identifier for the service item.
    pub id: Uuid,
    /// Whether the goods are stored at origin or destination.
    pub location: SitLocation,
    /// The first day in storage.
    pub sit_entry_date: NaiveDate,
    /// The day the goods left storage, if they have.
    #[serde(default)]
    pub sit_departure_date: Option<NaiveDate>,
    /// Authorized end date as recorded by the backend.
    #[serde(default)]
    pub sit_authorized_end_date: Option<NaiveDate>,
    /// When the customer contacted the contractor about delivery.
    #[serde(default)]
    pub sit_customer_contacted: Option<NaiveDate>,
    /// The delivery date the customer asked for.
    #[serde(default)]
    pub sit_requested_delivery: Option<NaiveDate>,
    /// The contractor's reason for placing the goods in storage.
    #[serde(default)]
    pub reason: Option<String>,
    /// Whether storage on this item is billed to the customer.
    #[serde(default)]
    pub convert_to_customer_expense: bool,
    /// Office remarks recorded with the conversion.
    #[serde(default)]
    pub customer_expense_reason: Option<String>,
}

impl SitServiceItem {
    /// Creates a service item with only the required fields set.
    ///
    /// # Examples
    ///
    /// ```
    /// use sit_ledger::models::{SitLocation, SitServiceItem};
    /// use chrono::NaiveDate;
    /// use uuid::Uuid;
    ///
    /// let item = SitServiceItem::new(
    ///     Uuid::new_v4(),
    ///     SitLocation::Origin,
    ///     NaiveDate::from_ymd_opt(2021, 8, 13).unwrap(),
    /// );
    /// assert!(item.sit_departure_date.is_none());
    /// assert!(!item.convert_to_customer_expense);
    /// ```
    pub fn new(id: Uuid, location: SitLocation, sit_entry_date: NaiveDate) -> Self {
        Self {
            id,
            location,
            sit_entry_date,
            sit_departure_date: None,
            sit_authorized_end_date: None,
            sit_customer_contacted: None,
            sit_requested_delivery: None,
            reason: None,
            convert_to_customer_expense: false,
            customer_expense_reason: None,
        }
    }

    /// Returns a copy of the item with a departure date set.
    pub fn departed(mut self, sit_departure_date: NaiveDate) -> Self {
        self.sit_departure_date = Some(sit_departure_date);
        self
    }

    /// Rejects items whose departure precedes their entry.
    pub fn validate(&self) -> SitResult<()> {
        match self.sit_departure_date {
            Some(departure) if departure < self.sit_entry_date => {
                Err(SitError::InvalidServiceItem {
                    service_item_id: self.id,
                    message: format!(
                        "departure date {} is before entry date {}",
                        departure, self.sit_entry_date
                    ),
                })
            }
            _ => Ok(()),
        }
    }

    /// Returns true if the goods left storage strictly before `today`.
    pub fn departed_before(&self, today: NaiveDate) -> bool {
        self.sit_departure_date.is_some_and(|d| d < today)
    }
}
