//! SIT extension review and office actions.
//!
//! This module holds the operations that change a shipment's SIT record:
//! submitting and reviewing extensions, adjusting the authorization
//! directly, converting SIT to customer expense, and recording customer
//! contact dates. Reviews and adjustments return a [`ReviewOutcome`] that
//! is applied to the shipment in one step.

mod authorization;
mod customer_contact;
mod customer_expense;
mod decision;
mod extension_request;
mod extension_review;
mod outcome;

pub use authorization::{SitAuthorizationAdjustment, adjust_sit_authorization};
pub use customer_contact::{CustomerContactDates, record_customer_contact};
pub use customer_expense::{CustomerExpenseToggle, convert_to_customer_expense};
pub use decision::{ExtensionDecision, ValidatedDecision};
pub use extension_request::{ExtensionRequest, submit_extension_request};
pub use extension_review::review_extension;
pub use outcome::{CustomerExpenseUpdate, ExtensionChange, ReviewOutcome};
