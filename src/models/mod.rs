//! Core data models for the SIT ledger.
//!
//! This module contains all the domain models used throughout the crate.

mod audit;
mod extension;
mod service_item;
mod shipment;
mod sit_status;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use extension::{SitExtension, SitExtensionReason, SitExtensionStatus};
pub use service_item::{SitLocation, SitServiceItem};
pub use shipment::Shipment;
pub use sit_status::{CurrentSit, EXPIRED_LABEL, SitStatus, SitStatusCalculation};
