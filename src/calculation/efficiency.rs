//! Efficiency bonus calculation.
//!
//! Trips covering more than a threshold of miles per day earn a bonus on the
//! excess. The bonus is independent of the mileage component; both apply.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{EfficiencyConfig, EfficiencyTier};
use crate::models::{AuditStep, per_day};

/// The result of the efficiency rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfficiencyResult {
    /// Miles divided by trip days (zero for a zero-day trip).
    pub miles_per_day: Decimal,
    /// The bonus earned.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the first tier whose threshold `miles_per_day` strictly exceeds.
pub fn select_efficiency_tier(
    miles_per_day: Decimal,
    tiers: &[EfficiencyTier],
) -> Option<&EfficiencyTier> {
    tiers
        .iter()
        .find(|tier| miles_per_day > tier.threshold_miles_per_day)
}

/// Calculates the efficiency bonus.
///
/// # Examples
///
/// ```
/// use travel_reimbursement::calculation::calculate_efficiency_bonus;
/// use travel_reimbursement::config::ReimbursementConfig;
/// use rust_decimal::Decimal;
///
/// let config = ReimbursementConfig::default();
/// let result = calculate_efficiency_bonus(Decimal::from(400), 2, &config.efficiency, 4);
///
/// // 200 miles/day, 100 above the threshold, at 0.3
/// assert_eq!(result.amount, Decimal::from(30));
/// ```
pub fn calculate_efficiency_bonus(
    miles: Decimal,
    days: u32,
    config: &EfficiencyConfig,
    step_number: u32,
) -> EfficiencyResult {
    let miles_per_day = per_day(miles, days);
    let tier = select_efficiency_tier(miles_per_day, &config.tiers);

    let (amount, reasoning) = match tier {
        Some(tier) => {
            let amount = (miles_per_day - tier.threshold_miles_per_day) * tier.rate;
            (
                amount,
                format!(
                    "{} miles/day exceeds {}: ({} - {}) x {} = ${}",
                    miles_per_day.round_dp(2),
                    tier.threshold_miles_per_day,
                    miles_per_day.round_dp(2),
                    tier.threshold_miles_per_day,
                    tier.rate,
                    amount.round_dp(2)
                ),
            )
        }
        None => (
            Decimal::ZERO,
            format!(
                "{} miles/day does not exceed any bonus threshold",
                miles_per_day.round_dp(2)
            ),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "efficiency_bonus".to_string(),
        rule_name: "Efficiency Bonus".to_string(),
        input: serde_json::json!({
            "miles": miles.to_string(),
            "days": days
        }),
        output: serde_json::json!({
            "miles_per_day": miles_per_day.to_string(),
            "threshold": tier.map(|t| t.threshold_miles_per_day.to_string()),
            "amount": amount.to_string()
        }),
        reasoning,
    };

    EfficiencyResult {
        miles_per_day,
        amount,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReimbursementConfig;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn legacy() -> EfficiencyConfig {
        ReimbursementConfig::default().efficiency
    }

    fn two_tier() -> EfficiencyConfig {
        EfficiencyConfig {
            tiers: vec![
                EfficiencyTier {
                    threshold_miles_per_day: dec("200"),
                    rate: dec("0.5"),
                },
                EfficiencyTier {
                    threshold_miles_per_day: dec("150"),
                    rate: dec("0.3"),
                },
            ],
        }
    }

    #[test]
    fn test_exactly_at_threshold_earns_nothing() {
        let result = calculate_efficiency_bonus(dec("300"), 3, &legacy(), 4);

        assert_eq!(result.miles_per_day, dec("100"));
        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.audit_step.output["threshold"].is_null());
    }

    #[test]
    fn test_above_threshold_earns_bonus_on_excess() {
        let result = calculate_efficiency_bonus(dec("250"), 1, &legacy(), 4);
        assert_eq!(result.amount, dec("45"));
    }

    #[test]
    fn test_fractional_miles_per_day() {
        let result = calculate_efficiency_bonus(dec("1000"), 3, &legacy(), 4);

        // (333.33.. - 100) * 0.3 rounds to 70.00
        assert_eq!(result.amount.round_dp(2), dec("70.00"));
    }

    #[test]
    fn test_zero_days_earns_nothing() {
        let result = calculate_efficiency_bonus(dec("1000"), 0, &legacy(), 4);

        assert_eq!(result.miles_per_day, Decimal::ZERO);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_first_matching_tier_wins() {
        let config = two_tier();

        assert_eq!(
            calculate_efficiency_bonus(dec("250"), 1, &config, 4).amount,
            dec("25")
        );
        assert_eq!(
            calculate_efficiency_bonus(dec("180"), 1, &config, 4).amount,
            dec("9")
        );
        assert_eq!(
            calculate_efficiency_bonus(dec("150"), 1, &config, 4).amount,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_no_tiers_means_no_bonus() {
        let config = EfficiencyConfig { tiers: vec![] };
        let result = calculate_efficiency_bonus(dec("5000"), 1, &config, 4);

        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("does not exceed"));
    }

    #[test]
    fn test_audit_step() {
        let result = calculate_efficiency_bonus(dec("400"), 2, &legacy(), 4);

        assert_eq!(result.audit_step.rule_id, "efficiency_bonus");
        assert_eq!(
            result.audit_step.output["threshold"].as_str().unwrap(),
            "100"
        );
        assert!(result.audit_step.reasoning.contains("exceeds 100"));
    }
}
