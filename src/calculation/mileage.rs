//! Mileage component calculation.
//!
//! Miles are charged marginally across the configured bands. The legacy
//! bands pay 0.50 per mile for the first 500 miles and 0.30 per mile beyond.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::MileageConfig;
use crate::models::AuditStep;

use super::tiers::{BandCharge, apply_marginal_bands};

/// The result of the mileage rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileageResult {
    /// Total mileage component.
    pub amount: Decimal,
    /// Charges per band, in band order.
    pub bands: Vec<BandCharge>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the mileage component.
///
/// # Examples
///
/// ```
/// use travel_reimbursement::calculation::calculate_mileage;
/// use travel_reimbursement::config::ReimbursementConfig;
/// use rust_decimal::Decimal;
///
/// let config = ReimbursementConfig::default();
/// let result = calculate_mileage(Decimal::from(600), &config.mileage, 2);
///
/// assert_eq!(result.amount, Decimal::from(280));
/// ```
pub fn calculate_mileage(miles: Decimal, config: &MileageConfig, step_number: u32) -> MileageResult {
    let (amount, bands) = apply_marginal_bands(miles, &config.bands);

    let breakdown: Vec<String> = bands
        .iter()
        .map(|b| format!("{}mi x ${}", b.units, b.rate))
        .collect();
    let reasoning = if breakdown.is_empty() {
        "No miles traveled".to_string()
    } else {
        format!("{} = ${}", breakdown.join(" + "), amount)
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "mileage".to_string(),
        rule_name: "Mileage Tiers".to_string(),
        input: serde_json::json!({
            "miles": miles.to_string()
        }),
        output: serde_json::json!({
            "amount": amount.to_string(),
            "bands": bands.iter().map(|b| serde_json::json!({
                "units": b.units.to_string(),
                "rate": b.rate.to_string(),
                "amount": b.amount.to_string()
            })).collect::<Vec<_>>()
        }),
        reasoning,
    };

    MileageResult {
        amount,
        bands,
        audit_step,
    }
}
