//! SIT extension model and related types.
//!
//! An extension is a contractor request for more storage days. It starts
//! out [`SitExtensionStatus::Pending`] and is decided exactly once by the
//! office.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The review status of an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SitExtensionStatus {
    /// Awaiting an office decision.
    Pending,
    /// Granted; the allowance was raised.
    Approved,
    /// Refused; the allowance is unchanged.
    Denied,
}

impl SitExtensionStatus {
    /// Returns true for `Approved` and `Denied`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SitExtensionStatus::Pending)
    }
}

impl fmt::Display for SitExtensionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SitExtensionStatus::Pending => "PENDING",
            SitExtensionStatus::Approved => "APPROVED",
            SitExtensionStatus::Denied => "DENIED",
        };
        f.write_str(s)
    }
}

/// Why more storage days are needed.
///
/// Wire spellings match the backend enum, including `IMPENDING_ASSIGNEMENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SitExtensionReason {
    /// The service member is seriously ill.
    SeriousIllnessMember,
    /// A dependent is seriously ill.
    SeriousIllnessDependent,
    /// The service member has an impending assignment.
    #[serde(rename = "IMPENDING_ASSIGNEMENT")]
    ImpendingAssignment,
    /// The service member is on directed temporary duty.
    DirectedTemporaryDuty,
    /// No civilian housing is available.
    NonavailabilityOfCivilianHousing,
    /// The new residence is not finished.
    AwaitingCompletionOfResidence,
    /// Anything else; see the remarks.
    Other,
}

impl SitExtensionReason {
    /// Returns the label shown to office users.
    pub fn label(&self) -> &'static str {
        match self {
            SitExtensionReason::SeriousIllnessMember => "Serious illness of the member",
            SitExtensionReason::SeriousIllnessDependent => "Serious illness or death of a dependent",
            SitExtensionReason::ImpendingAssignment => "Impending assignment to government quarters",
            SitExtensionReason::DirectedTemporaryDuty => "Directed temporary duty after arrival",
            SitExtensionReason::NonavailabilityOfCivilianHousing => {
                "Nonavailability of civilian housing"
            }
            SitExtensionReason::AwaitingCompletionOfResidence => {
                "Awaiting completion of residence under construction"
            }
            SitExtensionReason::Other => "Other reason",
        }
    }
}

/// A request for additional SIT days and, once decided, its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitExtension {
    /// Unique identifier for the extension.
    pub id: Uuid,
    /// The shipment the extension belongs to.
    pub shipment_id: Uuid,
    /// The review status.
    pub status: SitExtensionStatus,
    /// Why the extra days are needed.
    pub request_reason: SitExtensionReason,
    /// Days asked for by the contractor.
    pub requested_days: i64,
    /// Contractor remarks sent with the request.
    #[serde(default)]
    pub contractor_remarks: Option<String>,
    /// Days actually added to the allowance. Zero unless approved.
    #[serde(default)]
    pub approved_days: i64,
    /// Office remarks recorded with the decision.
    #[serde(default)]
    pub office_remarks: Option<String>,
    /// When the office decided.
    #[serde(default)]
    pub decision_date: Option<DateTime<Utc>>,
    /// When the request was submitted.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SitExtension {
    /// Returns true while the extension awaits a decision.
    pub fn is_pending(&self) -> bool {
        self.status == SitExtensionStatus::Pending
    }
}
