//! Shared state handed to every SIT ledger route.
//!
//! The ledger is stateless with respect to shipments. The only thing the
//! routes share is the policy loaded at startup.

use std::sync::Arc;

use crate::config::{ConfigLoader, SitPolicy};

/// Policy shared by every handler.
///
/// Shipments are never stored here; every request brings its own snapshot.
#[derive(Debug, Clone)]
pub struct AppState {
    policy: Arc<SitPolicy>,
}

impl AppState {
    /// Takes the policy out of a loaded configuration.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_policy(config.policy().clone())
    }

    /// Builds state around a policy that did not come from disk.
    pub fn with_policy(policy: SitPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// The policy in force.
    pub fn policy(&self) -> &SitPolicy {
        &self.policy
    }

    /// Remaining days at or below which conversion to customer expense is offered.
    pub fn customer_expense_threshold_days(&self) -> i64 {
        self.policy.customer_expense_threshold_days
    }

    /// Days added after customer contact or requested delivery.
    pub fn grace_period_days(&self) -> i64 {
        self.policy.grace_period_days
    }
}
