//! Conversion-to-customer-expense eligibility.
//!
//! Office users are offered the option of billing further storage to the
//! customer once the allowance is nearly used up.

use crate::models::{AuditStep, SitStatus};

/// The result of the eligibility check, including the audit step.
#[derive(Debug, Clone)]
pub struct ConvertEligibility {
    /// True when conversion should be offered.
    pub eligible: bool,
    /// The rules that blocked conversion. Empty when eligible.
    pub blocked_by: Vec<String>,
    /// The audit step recording this check.
    pub audit_step: AuditStep,
}

/// Decides whether to offer conversion of the current SIT to customer expense.
///
/// Conversion is offered when all of these hold:
/// - the remaining balance is at or below `threshold_days`
/// - there is a current SIT
/// - no extension is awaiting review
/// - the current SIT is not already converted
///
/// # Examples
///
/// ```
/// use sit_ledger::calculation::show_convert_to_customer_expense;
/// use sit_ledger::models::SitStatus;
///
/// let status = SitStatus {
///     total_sit_days_used: 80,
///     total_days_remaining: 10,
///     calculated_total_days_in_sit: 80,
///     current_sit: None,
///     past_sit_service_items: vec![],
/// };
/// let result = show_convert_to_customer_expense(&status, false, 30, 1);
/// assert!(!result.eligible);
/// assert_eq!(result.blocked_by, vec!["no_current_sit"]);
/// ```
pub fn show_convert_to_customer_expense(
    status: &SitStatus,
    has_pending_extension: bool,
    threshold_days: i64,
    step_number: u32,
) -> ConvertEligibility {
    let mut blocked_by = Vec::new();

    if status.total_days_remaining > threshold_days {
        blocked_by.push("days_remaining_above_threshold".to_string());
    }
    match &status.current_sit {
        None => blocked_by.push("no_current_sit".to_string()),
        Some(current) if current.convert_to_customer_expense => {
            blocked_by.push("already_converted".to_string());
        }
        Some(_) => {}
    }
    if has_pending_extension {
        blocked_by.push("pending_extension".to_string());
    }

    let eligible = blocked_by.is_empty();

    let reasoning = if eligible {
        format!(
            "{} day(s) remaining is at or below the {}-day threshold; conversion offered",
            status.total_days_remaining, threshold_days
        )
    } else {
        format!("Conversion not offered: {}", blocked_by.join(", "))
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "convert_to_customer_expense".to_string(),
        rule_name: "Convert To Customer Expense Eligibility".to_string(),
        input: serde_json::json!({
            "total_days_remaining": status.total_days_remaining,
            "threshold_days": threshold_days,
            "has_current_sit": status.current_sit.is_some(),
            "has_pending_extension": has_pending_extension,
            "already_converted": status
                .current_sit
                .as_ref()
                .is_some_and(|c| c.convert_to_customer_expense)
        }),
        output: serde_json::json!({
            "eligible": eligible,
            "blocked_by": blocked_by
        }),
        reasoning,
    };

    ConvertEligibility {
        eligible,
        blocked_by,
        audit_step,
    }
}
