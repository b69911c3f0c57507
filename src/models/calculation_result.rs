//! Calculation result models for the reimbursement engine.
//!
//! This module contains the [`ReimbursementResult`] type and its associated
//! structures: the component breakdown and the audit trace recording every
//! rule decision. Nothing here carries a timestamp, identifier, or duration,
//! so identical trips always produce identical results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TripInput;

/// Which clamp, if any, adjusted the aggregate.
///
/// # Example
///
/// ```
/// use travel_reimbursement::models::ClampOutcome;
///
/// let outcome = ClampOutcome::Unclamped;
/// assert_eq!(format!("{:?}", outcome), "Unclamped");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampOutcome {
    /// The aggregate was within bounds.
    Unclamped,
    /// The aggregate was raised to the floor.
    Floor,
    /// The aggregate was lowered to the cap.
    Cap,
}

/// The amount contributed by each rule, before rounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReimbursementBreakdown {
    /// Per-diem base component.
    pub per_diem: Decimal,
    /// Mileage component.
    pub mileage: Decimal,
    /// Receipt component.
    pub receipts: Decimal,
    /// Efficiency bonus.
    pub efficiency_bonus: Decimal,
    /// Sum of the four components.
    pub subtotal: Decimal,
    /// Lower bound for this trip.
    pub floor: Decimal,
    /// Upper bound for this trip, if the configuration has one.
    pub cap: Option<Decimal>,
    /// Which bound applied.
    pub clamp: ClampOutcome,
}

/// One rule application in the audit trace.
///
/// Amounts inside `input` and `output` are decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// Position in the pipeline, starting at 1.
    pub step_number: u32,
    /// Stable rule identifier such as `per_diem` or `clamp`.
    pub rule_id: String,
    /// Display name of the rule.
    pub rule_name: String,
    /// Values the rule read.
    pub input: serde_json::Value,
    /// Values the rule produced.
    pub output: serde_json::Value,
    /// The arithmetic, spelled out.
    pub reasoning: String,
}

/// A note attached to a result.
///
/// Warnings flag results worth a second look (such as a clamp binding)
/// without affecting the amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// Warning code, e.g. `CAP_APPLIED`.
    pub code: String,
    /// Explanation for a reviewer.
    pub message: String,
    /// `low` or `medium`.
    pub severity: String,
}

/// Every step and warning of one calculation, in order.
///
/// # Example
///
/// ```
/// use travel_reimbursement::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// Rule applications in pipeline order.
    pub steps: Vec<AuditStep>,
    /// Clamp warnings, if any.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns the step recorded for `rule_id`, if any.
    pub fn step(&self, rule_id: &str) -> Option<&AuditStep> {
        self.steps.iter().find(|s| s.rule_id == rule_id)
    }
}

/// The complete result of a reimbursement calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReimbursementResult {
    /// The trip that was reimbursed.
    pub input: TripInput,
    /// Name of the constant set used.
    pub config_name: String,
    /// The reimbursement, rounded to currency precision.
    pub amount: Decimal,
    /// Per-rule contributions.
    pub breakdown: ReimbursementBreakdown,
    /// How the amount was reached.
    pub audit_trace: AuditTrace,
}
