//! SIT service item sorting.
//!
//! Splits a shipment's SIT service items into past, current and future
//! relative to a given day, and selects the item the ledger treats as the
//! current SIT.

use chrono::NaiveDate;

use crate::models::SitServiceItem;

/// A shipment's SIT service items grouped relative to `today`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedShipmentSits<'a> {
    /// Items the goods left before today.
    pub past: Vec<&'a SitServiceItem>,
    /// Items entered on or before today and not yet departed before today.
    pub current: Vec<&'a SitServiceItem>,
    /// Items whose entry date is after today.
    pub future: Vec<&'a SitServiceItem>,
}

impl<'a> SortedShipmentSits<'a> {
    /// Returns the item the ledger reports as the current SIT.
    ///
    /// This is the earliest-entered current item, or the earliest-entered
    /// future item when nothing is in storage today. Ties keep input order.
    pub fn current_sit(&self) -> Option<&'a SitServiceItem> {
        earliest(&self.current).or_else(|| earliest(&self.future))
    }

    /// Returns true when the shipment has no past item and nothing current or upcoming.
    pub fn is_empty(&self) -> bool {
        self.past.is_empty() && self.current.is_empty() && self.future.is_empty()
    }
}

fn earliest<'a>(items: &[&'a SitServiceItem]) -> Option<&'a SitServiceItem> {
    items.iter().copied().min_by_key(|item| item.sit_entry_date)
}

/// Sorts SIT service items into past, current and future.
///
/// An item is future if it enters after `today`, past if it has a departure
/// date strictly before `today`, and current otherwise. Input order is kept
/// within each group.
///
/// # Examples
///
/// ```
/// use sit_ledger::calculation::sort_shipment_sits;
/// use sit_ledger::models::{SitLocation, SitServiceItem};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let today = NaiveDate::from_ymd_opt(2021, 8, 28).unwrap();
/// let items = vec![
///     SitServiceItem::new(Uuid::new_v4(), SitLocation::Origin, NaiveDate::from_ymd_opt(2021, 7, 24).unwrap())
///         .departed(NaiveDate::from_ymd_opt(2021, 8, 13).unwrap()),
///     SitServiceItem::new(Uuid::new_v4(), SitLocation::Destination, NaiveDate::from_ymd_opt(2021, 8, 13).unwrap()),
/// ];
///
/// let sorted = sort_shipment_sits(&items, today);
/// assert_eq!(sorted.past.len(), 1);
/// assert_eq!(sorted.current.len(), 1);
/// assert_eq!(sorted.current_sit().unwrap().id, items[1].id);
/// ```
pub fn sort_shipment_sits(items: &[SitServiceItem], today: NaiveDate) -> SortedShipmentSits<'_> {
    let mut sorted = SortedShipmentSits::default();

    for item in items {
        if item.sit_entry_date > today {
            sorted.future.push(item);
        } else if item.departed_before(today) {
            sorted.past.push(item);
        } else {
            sorted.current.push(item);
        }
    }

    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SitLocation;
    use uuid::Uuid;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn item(location: SitLocation, entry: &str) -> SitServiceItem {
        SitServiceItem::new(Uuid::new_v4(), location, make_date(entry))
    }

    #[test]
    fn test_entry_after_today_is_future() {
        let items = vec![item(SitLocation::Destination, "2021-09-01")];
        let sorted = sort_shipment_sits(&items, make_date("2021-08-28"));

        assert_eq!(sorted.future.len(), 1);
        assert!(sorted.current.is_empty());
        assert!(sorted.past.is_empty());
    }

    #[test]
    fn test_entry_today_is_current() {
        let items = vec![item(SitLocation::Origin, "2021-08-28")];
        let sorted = sort_shipment_sits(&items, make_date("2021-08-28"));

        assert_eq!(sorted.current.len(), 1);
    }

    #[test]
    fn test_departure_today_is_still_current() {
        let items = vec![item(SitLocation::Origin, "2021-08-01").departed(make_date("2021-08-28"))];
        let sorted = sort_shipment_sits(&items, make_date("2021-08-28"));

        assert_eq!(sorted.current.len(), 1);
        assert!(sorted.past.is_empty());
    }

    #[test]
    fn test_departure_before_today_is_past() {
        let items = vec![item(SitLocation::Origin, "2021-08-01").departed(make_date("2021-08-27"))];
        let sorted = sort_shipment_sits(&items, make_date("2021-08-28"));

        assert_eq!(sorted.past.len(), 1);
        assert!(sorted.current.is_empty());
    }

    #[test]
    fn test_current_sit_prefers_earliest_current() {
        let later = item(SitLocation::Destination, "2021-08-20");
        let earlier = item(SitLocation::Origin, "2021-08-10");
        let items = vec![later, earlier.clone()];

        let sorted = sort_shipment_sits(&items, make_date("2021-08-28"));
        assert_eq!(sorted.current_sit().unwrap().id, earlier.id);
    }

    #[test]
    fn test_current_sit_falls_back_to_earliest_future() {
        let past = item(SitLocation::Origin, "2021-07-01").departed(make_date("2021-07-20"));
        let far = item(SitLocation::Destination, "2021-10-01");
        let near = item(SitLocation::Destination, "2021-09-05");
        let items = vec![past, far, near.clone()];

        let sorted = sort_shipment_sits(&items, make_date("2021-08-28"));
        assert!(sorted.current.is_empty());
        assert_eq!(sorted.current_sit().unwrap().id, near.id);
    }

    #[test]
    fn test_equal_entry_dates_keep_input_order() {
        let first = item(SitLocation::Origin, "2021-08-10");
        let second = item(SitLocation::Destination, "2021-08-10");
        let items = vec![first.clone(), second];

        let sorted = sort_shipment_sits(&items, make_date("2021-08-28"));
        assert_eq!(sorted.current_sit().unwrap().id, first.id);
    }

    #[test]
    fn test_no_items_is_empty() {
        let sorted = sort_shipment_sits(&[], make_date("2021-08-28"));
        assert!(sorted.is_empty());
        assert!(sorted.current_sit().is_none());
    }
}
