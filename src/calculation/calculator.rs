//! The reimbursement calculator.
//!
//! Runs the rule stages in a fixed order over the raw trip attributes:
//!
//! 1. Per-diem base
//! 2. Mileage bands
//! 3. Receipt multiplier
//! 4. Efficiency bonus
//! 5. Floor and cap
//! 6. Rounding to currency precision
//!
//! Stages 1–4 each read the trip directly, never the running total. The
//! stages keep exact decimal amounts for the breakdown; the paid amount is
//! the clamped total evaluated as doubles and rounded to cents, which is how
//! the production calculator arrived at it (see `binary_amount`).

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::ReimbursementConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditTrace, ReimbursementBreakdown, ReimbursementResult, TripInput};

use super::binary::{binary_amount, round_to_cents};
use super::clamp::apply_clamp;
use super::efficiency::calculate_efficiency_bonus;
use super::mileage::calculate_mileage;
use super::per_diem::calculate_per_diem;
use super::receipts::calculate_receipts;

/// Calculates the reimbursement for a validated trip.
///
/// This is a pure function of `trip` and `config`.
pub fn calculate_reimbursement(trip: &TripInput, config: &ReimbursementConfig) -> ReimbursementResult {
    let days = trip.days();
    let miles = trip.miles();
    let receipts = trip.receipts();

    let per_diem = calculate_per_diem(days, &config.per_diem, 1);
    let mileage = calculate_mileage(miles, &config.mileage, 2);
    let receipt = calculate_receipts(receipts, days, &config.receipts, 3);
    let efficiency = calculate_efficiency_bonus(miles, days, &config.efficiency, 4);

    let subtotal = per_diem.amount + mileage.amount + receipt.amount + efficiency.amount;
    let clamp = apply_clamp(subtotal, days, miles, receipts, &config.clamp, 5);
    let binary_total = binary_amount(trip, config);
    let amount = round_to_cents(binary_total);

    let rounding_step = AuditStep {
        step_number: 6,
        rule_id: "rounding".to_string(),
        rule_name: "Currency Rounding".to_string(),
        input: serde_json::json!({
            "amount": clamp.amount.to_string(),
            "binary_amount": binary_total.to_string()
        }),
        output: serde_json::json!({
            "amount": amount.to_string()
        }),
        reasoning: format!(
            "${} evaluates to {} as a double, rounded to ${}",
            clamp.amount, binary_total, amount
        ),
    };

    debug!(
        days,
        miles = %miles,
        receipts = %receipts,
        subtotal = %subtotal,
        clamp = ?clamp.outcome,
        amount = %amount,
        "Computed reimbursement"
    );

    let breakdown = ReimbursementBreakdown {
        per_diem: per_diem.amount,
        mileage: mileage.amount,
        receipts: receipt.amount,
        efficiency_bonus: efficiency.amount,
        subtotal,
        floor: clamp.floor,
        cap: clamp.cap,
        clamp: clamp.outcome,
    };

    let audit_trace = AuditTrace {
        steps: vec![
            per_diem.audit_step,
            mileage.audit_step,
            receipt.audit_step,
            efficiency.audit_step,
            clamp.audit_step,
            rounding_step,
        ],
        warnings: clamp.warning.into_iter().collect(),
    };

    ReimbursementResult {
        input: *trip,
        config_name: config.metadata.name.clone(),
        amount,
        breakdown,
        audit_trace,
    }
}

/// Computes a reimbursement with a validated constant set.
///
/// The calculator holds no state beyond its configuration and can be shared
/// across threads freely.
///
/// # Example
///
/// ```
/// use travel_reimbursement::calculation::ReimbursementCalculator;
/// use rust_decimal::Decimal;
///
/// let calculator = ReimbursementCalculator::legacy();
/// let amount = calculator
///     .compute(1, Decimal::from(50), Decimal::from(10))
///     .unwrap();
///
/// assert_eq!(amount.to_string(), "121.00");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReimbursementCalculator {
    config: ReimbursementConfig,
}

impl ReimbursementCalculator {
    /// Creates a calculator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the rule tables are inconsistent.
    pub fn new(config: ReimbursementConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Creates a calculator with the legacy constants.
    pub fn legacy() -> Self {
        Self::default()
    }

    /// Returns the constant set in use.
    pub fn config(&self) -> &ReimbursementConfig {
        &self.config
    }

    /// Validates the trip attributes and returns the rounded reimbursement.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `days <= 0`, `miles < 0`, or `receipts < 0`.
    pub fn compute(&self, days: i64, miles: Decimal, receipts: Decimal) -> EngineResult<Decimal> {
        let trip = TripInput::new(days, miles, receipts)?;
        Ok(self.calculate(&trip).amount)
    }

    /// Parses the trip attributes from text and returns the rounded
    /// reimbursement.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for non-numeric or out-of-range values.
    pub fn compute_str(&self, days: &str, miles: &str, receipts: &str) -> EngineResult<Decimal> {
        let trip = TripInput::parse(days, miles, receipts)?;
        Ok(self.calculate(&trip).amount)
    }

    /// Calculates the full result, with breakdown and audit trace.
    pub fn calculate(&self, trip: &TripInput) -> ReimbursementResult {
        calculate_reimbursement(trip, &self.config)
    }
}

/// Computes a reimbursement with the legacy constants.
///
/// # Example
///
/// ```
/// use travel_reimbursement::calculation::compute;
/// use rust_decimal::Decimal;
///
/// let amount = compute(15, Decimal::from(600), Decimal::from(50)).unwrap();
/// assert_eq!(amount, Decimal::from(1285));
/// ```
pub fn compute(days: i64, miles: Decimal, receipts: Decimal) -> EngineResult<Decimal> {
    ReimbursementCalculator::legacy().compute(days, miles, receipts)
}
