//! Configuration types for the SIT ledger.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

/// The SIT policy loaded from `policy.yaml`.
///
/// Holds the thresholds the calculator and review rules apply that are
/// policy rather than arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SitPolicy {
    /// The human-readable name of the policy.
    pub name: String,
    /// The version or effective date of the policy.
    pub version: String,
    /// Remaining days at or below which conversion to customer expense is offered.
    pub customer_expense_threshold_days: i64,
    /// Days after customer contact or requested delivery before authorization ends.
    pub grace_period_days: i64,
}

impl Default for SitPolicy {
    fn default() -> Self {
        Self {
            name: "Storage in Transit policy".to_string(),
            version: "default".to_string(),
            customer_expense_threshold_days: 30,
            grace_period_days: 5,
        }
    }
}
