//! Per-diem base calculation.
//!
//! A daily rate is chosen by trip length from an ordered bracket table and
//! paid for every day of the trip. With the legacy constants:
//!
//! | Trip length | Daily rate |
//! |-------------|-----------:|
//! | 1 day       | 90         |
//! | 2–10 days   | 75         |
//! | > 10 days   | 65         |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{PerDiemConfig, PerDiemTier};
use crate::models::AuditStep;

/// The result of the per-diem rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerDiemResult {
    /// The daily rate selected for the trip length.
    pub daily_rate: Decimal,
    /// `daily_rate * days`.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Selects the daily rate for a trip of `days` days.
///
/// The first tier whose `max_days` is at least `days` wins; a tier without
/// `max_days` matches any length. Returns zero if no tier matches.
pub fn select_per_diem_rate(days: u32, tiers: &[PerDiemTier]) -> Decimal {
    tiers
        .iter()
        .find(|tier| tier.max_days.is_none_or(|max_days| days <= max_days))
        .map_or(Decimal::ZERO, |tier| tier.daily_rate)
}

/// Calculates the per-diem base component.
///
/// # Examples
///
/// ```
/// use travel_reimbursement::calculation::calculate_per_diem;
/// use travel_reimbursement::config::ReimbursementConfig;
/// use rust_decimal::Decimal;
///
/// let config = ReimbursementConfig::default();
/// let result = calculate_per_diem(15, &config.per_diem, 1);
///
/// assert_eq!(result.daily_rate, Decimal::from(65));
/// assert_eq!(result.amount, Decimal::from(975));
/// ```
pub fn calculate_per_diem(days: u32, config: &PerDiemConfig, step_number: u32) -> PerDiemResult {
    let daily_rate = select_per_diem_rate(days, &config.tiers);
    let amount = daily_rate * Decimal::from(days);

    let audit_step = AuditStep {
        step_number,
        rule_id: "per_diem".to_string(),
        rule_name: "Per-Diem Base".to_string(),
        input: serde_json::json!({
            "days": days
        }),
        output: serde_json::json!({
            "daily_rate": daily_rate.to_string(),
            "amount": amount.to_string()
        }),
        reasoning: format!("{} day(s) x ${}/day = ${}", days, daily_rate, amount),
    };

    PerDiemResult {
        daily_rate,
        amount,
        audit_step,
    }
}
