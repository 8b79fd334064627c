//! Shipment SIT allowance calculation.
//!
//! The allowance is the entitlement the shipment started with plus every
//! day granted by an approved extension or office adjustment.

use crate::models::{AuditStep, SitExtension, SitExtensionStatus};

/// The result of an allowance calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct AllowanceResult {
    /// Entitlement plus approved extension days.
    pub sit_days_allowance: i64,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates a shipment's SIT allowance from its entitlement and extension history.
///
/// Only approved extensions count. Office adjustments are recorded as
/// approved extensions with a signed delta, so a lowered authorization
/// reduces the sum.
///
/// # Examples
///
/// ```
/// use sit_ledger::calculation::calculate_sit_allowance;
///
/// let result = calculate_sit_allowance(90, &[], 1);
/// assert_eq!(result.sit_days_allowance, 90);
/// ```
pub fn calculate_sit_allowance(
    entitlement_days: i64,
    extensions: &[SitExtension],
    step_number: u32,
) -> AllowanceResult {
    let approved: Vec<&SitExtension> = extensions
        .iter()
        .filter(|e| e.status == SitExtensionStatus::Approved)
        .collect();
    let approved_days: i64 = approved.iter().map(|e| e.approved_days).sum();
    let sit_days_allowance = entitlement_days + approved_days;

    let audit_step = AuditStep {
        step_number,
        rule_id: "sit_allowance".to_string(),
        rule_name: "SIT Days Allowance".to_string(),
        input: serde_json::json!({
            "entitlement_days": entitlement_days,
            "approved_extensions": approved
                .iter()
                .map(|e| serde_json::json!({
                    "extension_id": e.id.to_string(),
                    "approved_days": e.approved_days
                }))
                .collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "sit_days_allowance": sit_days_allowance
        }),
        reasoning: format!(
            "{} entitlement day(s) + {} approved day(s) from {} extension(s) = {}",
            entitlement_days,
            approved_days,
            approved.len(),
            sit_days_allowance
        ),
    };

    AllowanceResult {
        sit_days_allowance,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SitExtensionReason;
    use uuid::Uuid;

    fn extension(status: SitExtensionStatus, approved_days: i64) -> SitExtension {
        SitExtension {
            id: Uuid::new_v4(),
            shipment_id: Uuid::nil(),
            status,
            request_reason: SitExtensionReason::Other,
            requested_days: 30,
            contractor_remarks: None,
            approved_days,
            office_remarks: None,
            decision_date: None,
            created_at: None,
        }
    }

    #[test]
    fn test_approved_extensions_add_to_entitlement() {
        let extensions = vec![
            extension(SitExtensionStatus::Approved, 45),
            extension(SitExtensionStatus::Approved, 30),
        ];
        let result = calculate_sit_allowance(90, &extensions, 1);

        assert_eq!(result.sit_days_allowance, 165);
        assert_eq!(result.audit_step.rule_id, "sit_allowance");
    }

    #[test]
    fn test_pending_and_denied_extensions_are_ignored() {
        let extensions = vec![
            extension(SitExtensionStatus::Pending, 0),
            extension(SitExtensionStatus::Denied, 0),
            extension(SitExtensionStatus::Approved, 10),
        ];
        let result = calculate_sit_allowance(90, &extensions, 1);

        assert_eq!(result.sit_days_allowance, 100);
    }

    #[test]
    fn test_negative_adjustment_lowers_allowance() {
        let extensions = vec![extension(SitExtensionStatus::Approved, -20)];
        let result = calculate_sit_allowance(90, &extensions, 1);

        assert_eq!(result.sit_days_allowance, 70);
    }
}
