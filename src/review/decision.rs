//! Office decisions on SIT extensions.
//!
//! The wire shape [`ExtensionDecision`] carries optional fields whose
//! meaning depends on `accept`. [`ExtensionDecision::validate`] turns it
//! into a [`ValidatedDecision`] that only holds what the chosen branch needs.

use serde::{Deserialize, Serialize};

use crate::error::{SitError, SitResult};
use crate::models::SitExtensionReason;

/// An office user's decision on a pending extension, as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDecision {
    /// True to approve, false to deny.
    pub accept: bool,
    /// The shipment's new total allowance. Required when approving.
    #[serde(default)]
    pub days_approved: Option<i64>,
    /// The reason recorded on the decided extension.
    pub request_reason: SitExtensionReason,
    /// Office remarks. Required when denying.
    #[serde(default)]
    pub office_remarks: Option<String>,
    /// Bill the current SIT to the customer. Only valid when denying.
    #[serde(default)]
    pub convert_to_customer_expense: Option<bool>,
}

/// A decision that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedDecision {
    /// Raise the allowance to `days_approved`.
    Approve {
        /// The new total allowance.
        days_approved: i64,
        /// The reason recorded on the extension.
        request_reason: SitExtensionReason,
        /// Optional office remarks, trimmed.
        office_remarks: Option<String>,
    },
    /// Leave the allowance unchanged.
    Deny {
        /// The reason recorded on the extension.
        request_reason: SitExtensionReason,
        /// Why the extension was denied, trimmed.
        office_remarks: String,
        /// Whether the current SIT is billed to the customer from now on.
        convert_to_customer_expense: bool,
    },
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ExtensionDecision {
    /// Validates the decision against the shipment's current allowance.
    ///
    /// Approvals need `days_approved` greater than zero and at least
    /// `current_allowance`, and may not convert to customer expense.
    /// Denials need non-blank office remarks; any `days_approved` sent
    /// with a denial is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use sit_ledger::models::SitExtensionReason;
    /// use sit_ledger::review::{ExtensionDecision, ValidatedDecision};
    ///
    /// let decision = ExtensionDecision {
    ///     accept: true,
    ///     days_approved: Some(90),
    ///     request_reason: SitExtensionReason::SeriousIllnessMember,
    ///     office_remarks: None,
    ///     convert_to_customer_expense: None,
    /// };
    /// assert!(matches!(
    ///     decision.validate(45).unwrap(),
    ///     ValidatedDecision::Approve { days_approved: 90, .. }
    /// ));
    /// assert!(decision.validate(120).is_err());
    /// ```
    pub fn validate(&self, current_allowance: i64) -> SitResult<ValidatedDecision> {
        let office_remarks = non_blank(&self.office_remarks);

        if self.accept {
            let days_approved = self.days_approved.ok_or_else(|| SitError::InvalidField {
                field: "days_approved".to_string(),
                message: "required when approving an extension".to_string(),
            })?;

            if days_approved <= 0 {
                return Err(SitError::InvalidDayCount {
                    field: "days_approved".to_string(),
                    days: days_approved,
                });
            }
            if days_approved < current_allowance {
                return Err(SitError::DaysApprovedBelowAllowance {
                    days_approved,
                    current_allowance,
                });
            }
            if self.convert_to_customer_expense == Some(true) {
                return Err(SitError::InvalidField {
                    field: "convert_to_customer_expense".to_string(),
                    message: "only allowed when denying an extension".to_string(),
                });
            }

            Ok(ValidatedDecision::Approve {
                days_approved,
                request_reason: self.request_reason,
                office_remarks,
            })
        } else {
            let office_remarks = office_remarks.ok_or_else(|| SitError::InvalidField {
                field: "office_remarks".to_string(),
                message: "required when denying an extension".to_string(),
            })?;

            Ok(ValidatedDecision::Deny {
                request_reason: self.request_reason,
                office_remarks,
                convert_to_customer_expense: self.convert_to_customer_expense.unwrap_or(false),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approve(days_approved: Option<i64>) -> ExtensionDecision {
        ExtensionDecision {
            accept: true,
            days_approved,
            request_reason: SitExtensionReason::SeriousIllnessMember,
            office_remarks: None,
            convert_to_customer_expense: None,
        }
    }

    fn deny(office_remarks: Option<&str>) -> ExtensionDecision {
        ExtensionDecision {
            accept: false,
            days_approved: None,
            request_reason: SitExtensionReason::Other,
            office_remarks: office_remarks.map(str::to_string),
            convert_to_customer_expense: None,
        }
    }

    #[test]
    fn test_approve_equal_to_allowance_is_valid() {
        let validated = approve(Some(90)).validate(90).unwrap();
        assert_eq!(
            validated,
            ValidatedDecision::Approve {
                days_approved: 90,
                request_reason: SitExtensionReason::SeriousIllnessMember,
                office_remarks: None,
            }
        );
    }

    #[test]
    fn test_approve_without_days_is_rejected() {
        match approve(None).validate(45) {
            Err(SitError::InvalidField { field, .. }) => assert_eq!(field, "days_approved"),
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_approve_zero_days_is_rejected() {
        assert!(matches!(
            approve(Some(0)).validate(0),
            Err(SitError::InvalidDayCount { days: 0, .. })
        ));
        assert!(matches!(
            approve(Some(-5)).validate(0),
            Err(SitError::InvalidDayCount { days: -5, .. })
        ));
    }

    #[test]
    fn test_approve_below_allowance_is_rejected() {
        assert!(matches!(
            approve(Some(44)).validate(45),
            Err(SitError::DaysApprovedBelowAllowance {
                days_approved: 44,
                current_allowance: 45
            })
        ));
    }

    #[test]
    fn test_approve_with_conversion_is_rejected() {
        let mut decision = approve(Some(90));
        decision.convert_to_customer_expense = Some(true);

        match decision.validate(45) {
            Err(SitError::InvalidField { field, .. }) => {
                assert_eq!(field, "convert_to_customer_expense")
            }
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_approve_keeps_trimmed_remarks() {
        let mut decision = approve(Some(90));
        decision.office_remarks = Some("  approved for illness ".to_string());

        match decision.validate(45).unwrap() {
            ValidatedDecision::Approve { office_remarks, .. } => {
                assert_eq!(office_remarks.as_deref(), Some("approved for illness"));
            }
            other => panic!("Expected Approve, got {:?}", other),
        }
    }

    #[test]
    fn test_deny_without_remarks_is_rejected() {
        assert!(matches!(
            deny(None).validate(45),
            Err(SitError::InvalidField { .. })
        ));
        assert!(matches!(
            deny(Some("   ")).validate(45),
            Err(SitError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_deny_defaults_conversion_to_false() {
        match deny(Some("not justified")).validate(45).unwrap() {
            ValidatedDecision::Deny {
                office_remarks,
                convert_to_customer_expense,
                ..
            } => {
                assert_eq!(office_remarks, "not justified");
                assert!(!convert_to_customer_expense);
            }
            other => panic!("Expected Deny, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_minimal_denial() {
        let json = r#"{
            "accept": false,
            "request_reason": "OTHER",
            "office_remarks": "denied",
            "convert_to_customer_expense": true
        }"#;

        let decision: ExtensionDecision = serde_json::from_str(json).unwrap();
        assert!(!decision.accept);
        assert!(decision.days_approved.is_none());
        assert_eq!(decision.convert_to_customer_expense, Some(true));
    }
}
