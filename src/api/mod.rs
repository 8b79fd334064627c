//! HTTP API module for the SIT ledger.
//!
//! This module provides REST endpoints over the ledger calculator and the
//! extension review operations. Every request carries the shipment
//! snapshot it works on and gets the updated snapshot back.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AdjustAuthorizationRequest, ConvertToCustomerExpenseRequest, CustomerContactRequest,
    ReviewExtensionRequest, ShipmentRequest, SitEndDateRequest, SitStatusRequest,
    SubmitExtensionRequest,
};
pub use response::{
    ApiError, CustomerContactResponse, CustomerExpenseResponse, ExtensionResponse,
    ReviewResponse, SitEndDateResponse, SitStatusResponse,
};
pub use state::AppState;
