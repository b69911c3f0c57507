//! Floor and cap clamping of the aggregate reimbursement.
//!
//! The floor is applied first, then the cap, so a cap below the floor wins.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{CapConfig, ClampConfig};
use crate::models::{AuditStep, AuditWarning, ClampOutcome};

/// The result of clamping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampResult {
    /// The clamped (unrounded) amount.
    pub amount: Decimal,
    /// The floor for this trip.
    pub floor: Decimal,
    /// The cap for this trip, if configured.
    pub cap: Option<Decimal>,
    /// Which bound applied.
    pub outcome: ClampOutcome,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Raised when a bound changed the amount.
    pub warning: Option<AuditWarning>,
}

/// Computes `days * per_day + receipts * receipts_factor + miles * miles_factor`.
pub fn cap_for(days: u32, miles: Decimal, receipts: Decimal, cap: &CapConfig) -> Decimal {
    Decimal::from(days) * cap.per_day + receipts * cap.receipts_factor + miles * cap.miles_factor
}

/// Applies the floor and cap to `subtotal`.
///
/// # Examples
///
/// ```
/// use travel_reimbursement::calculation::apply_clamp;
/// use travel_reimbursement::config::ReimbursementConfig;
/// use travel_reimbursement::models::ClampOutcome;
/// use rust_decimal::Decimal;
///
/// let config = ReimbursementConfig::default();
/// let result = apply_clamp(
///     Decimal::from(121),
///     1,
///     Decimal::from(50),
///     Decimal::from(10),
///     &config.clamp,
///     5,
/// );
///
/// assert_eq!(result.floor, Decimal::from(60));
/// assert_eq!(result.cap, Some(Decimal::from(415)));
/// assert_eq!(result.outcome, ClampOutcome::Unclamped);
/// ```
pub fn apply_clamp(
    subtotal: Decimal,
    days: u32,
    miles: Decimal,
    receipts: Decimal,
    config: &ClampConfig,
    step_number: u32,
) -> ClampResult {
    let floor = Decimal::from(days) * config.floor_per_day;
    let cap = config
        .cap
        .as_ref()
        .map(|cap| cap_for(days, miles, receipts, cap));

    let mut amount = subtotal;
    let mut outcome = ClampOutcome::Unclamped;

    if amount < floor {
        amount = floor;
        outcome = ClampOutcome::Floor;
    }
    if let Some(cap) = cap.filter(|cap| amount > *cap) {
        amount = cap;
        outcome = ClampOutcome::Cap;
    }

    let reasoning = match outcome {
        ClampOutcome::Unclamped => format!(
            "${} is within bounds (floor ${}, cap {})",
            subtotal,
            floor,
            cap.map_or("none".to_string(), |c| format!("${}", c))
        ),
        ClampOutcome::Floor => format!("${} raised to floor ${}", subtotal, floor),
        ClampOutcome::Cap => format!("${} lowered to cap ${}", subtotal, amount),
    };

    let warning = match outcome {
        ClampOutcome::Unclamped => None,
        ClampOutcome::Floor => Some(AuditWarning {
            code: "FLOOR_APPLIED".to_string(),
            message: reasoning.clone(),
            severity: "low".to_string(),
        }),
        ClampOutcome::Cap => Some(AuditWarning {
            code: "CAP_APPLIED".to_string(),
            message: reasoning.clone(),
            severity: "medium".to_string(),
        }),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "clamp".to_string(),
        rule_name: "Floor and Cap".to_string(),
        input: serde_json::json!({
            "subtotal": subtotal.to_string(),
            "days": days,
            "miles": miles.to_string(),
            "receipts": receipts.to_string()
        }),
        output: serde_json::json!({
            "floor": floor.to_string(),
            "cap": cap.map(|c| c.to_string()),
            "amount": amount.to_string(),
            "outcome": outcome
        }),
        reasoning,
    };

    ClampResult {
        amount,
        floor,
        cap,
        outcome,
        audit_step,
        warning,
    }
}
