//! Storage-in-transit (SIT) ledger for household goods shipments
//!
//! This crate computes how many days of SIT a shipment has used and has
//! left, and runs the office workflow for extending, adjusting or
//! converting SIT to customer expense. All operations work on an in-memory
//! shipment snapshot supplied by the caller.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod review;
