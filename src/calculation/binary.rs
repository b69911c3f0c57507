//! Binary floating-point evaluation of the clamped aggregate.
//!
//! The production calculator summed its components as IEEE-754 doubles and
//! rounded the resulting binary value to cents. Where the exact decimal sum
//! ends in a 5 at the third place, the double lies slightly above or below
//! the midpoint, and that decides the cent. The decimal stages explain an
//! amount; this module reproduces the cent that was paid.
//!
//! Tier selection is shared with the decimal stages. Only the arithmetic is
//! repeated here, in the production operation order:
//!
//! ```text
//! total = ((per_diem + receipts) + mileage) + efficiency_bonus
//! total = max(total, floor)
//! total = min(total, cap)
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::config::{ClampConfig, RateBand, ReceiptSchedule, ReimbursementConfig};
use crate::models::TripInput;

use super::efficiency::select_efficiency_tier;
use super::per_diem::select_per_diem_rate;
use super::receipts::select_receipt_multiplier;

/// Decimal places of a reimbursement amount.
pub const CURRENCY_DECIMAL_PLACES: usize = 2;

/// The four components as doubles, before clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryTerms {
    /// Per-diem base.
    pub per_diem: f64,
    /// Receipt component.
    pub receipts: f64,
    /// Mileage component.
    pub mileage: f64,
    /// Efficiency bonus.
    pub efficiency_bonus: f64,
}

impl BinaryTerms {
    /// Sums the components left to right.
    pub fn total(&self) -> f64 {
        ((self.per_diem + self.receipts) + self.mileage) + self.efficiency_bonus
    }
}

/// Converts a decimal to the nearest double, as parsing its text would.
pub fn to_binary(value: Decimal) -> f64 {
    f64::from_str(&value.to_string()).unwrap_or(f64::NAN)
}

/// Rounds the exact binary value of `value` to cents, ties to even.
///
/// # Examples
///
/// ```
/// use travel_reimbursement::calculation::round_to_cents;
///
/// assert_eq!(round_to_cents(121.0).to_string(), "121.00");
/// // 90.025 is stored as 90.02500000000000568...
/// assert_eq!(round_to_cents(90.0 + 0.05 * 0.5).to_string(), "90.03");
/// ```
pub fn round_to_cents(value: f64) -> Decimal {
    // `{:.N}` formats the exact binary value, so this is a single rounding
    Decimal::from_str(&format!("{:.*}", CURRENCY_DECIMAL_PLACES, value)).unwrap_or(Decimal::ZERO)
}

/// Charges `quantity` against `bands` in order, as doubles.
pub fn binary_marginal_bands(quantity: f64, bands: &[RateBand]) -> f64 {
    let mut remaining = quantity;
    let mut total = 0.0;

    for band in bands {
        if remaining <= 0.0 {
            break;
        }
        let units = band
            .width
            .map_or(remaining, |width| remaining.min(to_binary(width)));
        total += units * to_binary(band.rate);
        remaining -= units;
    }

    total
}

/// Computes the four components of `trip` as doubles.
pub fn binary_terms(trip: &TripInput, config: &ReimbursementConfig) -> BinaryTerms {
    let days = f64::from(trip.days());
    let miles = to_binary(trip.miles());
    let receipts = to_binary(trip.receipts());

    let per_diem = to_binary(select_per_diem_rate(trip.days(), &config.per_diem.tiers)) * days;

    let receipt_amount = match &config.receipts {
        ReceiptSchedule::PerDayMultiplier {
            tiers,
            default_multiplier,
        } => {
            let multiplier =
                select_receipt_multiplier(trip.receipts_per_day(), tiers, *default_multiplier);
            to_binary(multiplier) * receipts
        }
        ReceiptSchedule::Marginal { bands } => binary_marginal_bands(receipts, bands),
    };

    let mileage = binary_marginal_bands(miles, &config.mileage.bands);

    let efficiency_bonus = select_efficiency_tier(trip.miles_per_day(), &config.efficiency.tiers)
        .map_or(0.0, |tier| {
            (miles / days - to_binary(tier.threshold_miles_per_day)) * to_binary(tier.rate)
        });

    BinaryTerms {
        per_diem,
        receipts: receipt_amount,
        mileage,
        efficiency_bonus,
    }
}

/// Applies the floor, then the cap, to a double total.
pub fn binary_clamp(total: f64, trip: &TripInput, config: &ClampConfig) -> f64 {
    let days = f64::from(trip.days());
    let mut amount = total;

    let floor = days * to_binary(config.floor_per_day);
    if floor > amount {
        amount = floor;
    }

    if let Some(cap) = &config.cap {
        let cap = (days * to_binary(cap.per_day)
            + to_binary(trip.receipts()) * to_binary(cap.receipts_factor))
            + to_binary(trip.miles()) * to_binary(cap.miles_factor);
        if cap < amount {
            amount = cap;
        }
    }

    amount
}

/// Evaluates `trip` as doubles and returns the clamped, unrounded total.
pub fn binary_amount(trip: &TripInput, config: &ReimbursementConfig) -> f64 {
    binary_clamp(binary_terms(trip, config).total(), trip, &config.clamp)
}
