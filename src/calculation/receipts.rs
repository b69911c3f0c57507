//! Receipt component calculation.
//!
//! The legacy schedule picks one multiplier from receipts-per-day and applies
//! it to the whole receipt total:
//!
//! | Receipts per day | Multiplier |
//! |------------------|-----------:|
//! | > 300            | 0.2        |
//! | > 150            | 0.4        |
//! | < 50             | 0.6        |
//! | otherwise        | 0.5        |
//!
//! Comparisons are strict, so exactly 150/day and exactly 50/day both fall
//! through to the 0.5 default. A marginal schedule over the absolute total
//! is also supported.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{ReceiptSchedule, ReceiptTier};
use crate::models::{AuditStep, per_day};

use super::tiers::{BandCharge, apply_marginal_bands};

/// The result of the receipt rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptResult {
    /// Receipts divided by trip days (zero for a zero-day trip).
    pub receipts_per_day: Decimal,
    /// The multiplier applied, for per-day multiplier schedules.
    pub multiplier: Option<Decimal>,
    /// Band charges, for marginal schedules.
    pub bands: Vec<BandCharge>,
    /// Total receipt component.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Selects the receipt multiplier for a receipts-per-day value.
///
/// Tiers are evaluated top-down and the first match wins; `default` applies
/// when none match.
pub fn select_receipt_multiplier(
    receipts_per_day: Decimal,
    tiers: &[ReceiptTier],
    default: Decimal,
) -> Decimal {
    tiers
        .iter()
        .find(|tier| tier.comparison.matches(receipts_per_day, tier.per_day))
        .map_or(default, |tier| tier.multiplier)
}

/// Calculates the receipt component.
///
/// # Examples
///
/// ```
/// use travel_reimbursement::calculation::calculate_receipts;
/// use travel_reimbursement::config::ReimbursementConfig;
/// use rust_decimal::Decimal;
///
/// let config = ReimbursementConfig::default();
/// let result = calculate_receipts(Decimal::from(150), 3, &config.receipts, 3);
///
/// assert_eq!(result.multiplier, Some(Decimal::new(5, 1)));
/// assert_eq!(result.amount, Decimal::from(75));
/// ```
pub fn calculate_receipts(
    receipts: Decimal,
    days: u32,
    schedule: &ReceiptSchedule,
    step_number: u32,
) -> ReceiptResult {
    let receipts_per_day = per_day(receipts, days);

    let (amount, multiplier, bands, reasoning) = match schedule {
        ReceiptSchedule::PerDayMultiplier {
            tiers,
            default_multiplier,
        } => {
            let multiplier =
                select_receipt_multiplier(receipts_per_day, tiers, *default_multiplier);
            let amount = receipts * multiplier;
            let reasoning = format!(
                "${}/day selects multiplier {}: ${} x {} = ${}",
                receipts_per_day.round_dp(2),
                multiplier,
                receipts,
                multiplier,
                amount
            );
            (amount, Some(multiplier), Vec::new(), reasoning)
        }
        ReceiptSchedule::Marginal { bands } => {
            let (amount, charges) = apply_marginal_bands(receipts, bands);
            let reasoning = format!(
                "${} charged across {} band(s) = ${}",
                receipts,
                charges.len(),
                amount
            );
            (amount, None, charges, reasoning)
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "receipts".to_string(),
        rule_name: "Receipt Multiplier".to_string(),
        input: serde_json::json!({
            "receipts": receipts.to_string(),
            "days": days
        }),
        output: serde_json::json!({
            "receipts_per_day": receipts_per_day.to_string(),
            "multiplier": multiplier.map(|m| m.to_string()),
            "amount": amount.to_string()
        }),
        reasoning,
    };

    ReceiptResult {
        receipts_per_day,
        multiplier,
        bands,
        amount,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RateBand, ReimbursementConfig};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn legacy() -> ReceiptSchedule {
        ReimbursementConfig::default().receipts
    }

    fn multiplier_for(receipts: &str, days: u32) -> Decimal {
        calculate_receipts(dec(receipts), days, &legacy(), 3)
            .multiplier
            .unwrap()
    }

    #[test]
    fn test_high_spending_gets_lowest_multiplier() {
        assert_eq!(multiplier_for("400", 1), dec("0.2"));
        assert_eq!(multiplier_for("1500.01", 5), dec("0.2"));
    }

    #[test]
    fn test_exactly_300_per_day_is_not_high() {
        assert_eq!(multiplier_for("300", 1), dec("0.4"));
    }

    #[test]
    fn test_upper_middle_spending() {
        assert_eq!(multiplier_for("200", 1), dec("0.4"));
        assert_eq!(multiplier_for("150.01", 1), dec("0.4"));
    }

    #[test]
    fn test_exactly_150_per_day_uses_default() {
        assert_eq!(multiplier_for("150", 1), dec("0.5"));
    }

    #[test]
    fn test_exactly_50_per_day_uses_default() {
        assert_eq!(multiplier_for("150", 3), dec("0.5"));
    }

    #[test]
    fn test_low_spending_gets_highest_multiplier() {
        assert_eq!(multiplier_for("49.99", 1), dec("0.6"));
        assert_eq!(multiplier_for("50", 15), dec("0.6"));
    }

    #[test]
    fn test_multiplier_applies_to_full_total() {
        let result = calculate_receipts(dec("900"), 2, &legacy(), 3);

        // 450/day > 300 → 0.2 on the whole 900
        assert_eq!(result.receipts_per_day, dec("450"));
        assert_eq!(result.amount, dec("180"));
    }

    #[test]
    fn test_zero_days_treats_ratio_as_zero() {
        let result = calculate_receipts(dec("1000"), 0, &legacy(), 3);

        assert_eq!(result.receipts_per_day, Decimal::ZERO);
        assert_eq!(result.multiplier, Some(dec("0.6")));
        assert_eq!(result.amount, dec("600"));
    }

    #[test]
    fn test_marginal_schedule() {
        let schedule = ReceiptSchedule::Marginal {
            bands: vec![
                RateBand {
                    width: Some(dec("200")),
                    rate: dec("0.8"),
                },
                RateBand {
                    width: Some(dec("300")),
                    rate: dec("0.6"),
                },
                RateBand {
                    width: None,
                    rate: dec("0.4"),
                },
            ],
        };

        let result = calculate_receipts(dec("600"), 2, &schedule, 3);

        // 160 + 180 + 40
        assert_eq!(result.amount, dec("380"));
        assert_eq!(result.multiplier, None);
        assert_eq!(result.bands.len(), 3);
        assert!(result.audit_step.output["multiplier"].is_null());
    }

    #[test]
    fn test_audit_step() {
        let result = calculate_receipts(dec("10"), 1, &legacy(), 3);

        assert_eq!(result.audit_step.rule_id, "receipts");
        assert_eq!(result.audit_step.step_number, 3);
        assert_eq!(
            result.audit_step.output["multiplier"].as_str().unwrap(),
            "0.6"
        );
        assert!(result.audit_step.reasoning.contains("multiplier 0.6"));
    }
}
