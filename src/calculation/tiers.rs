//! Marginal band consumption shared by the mileage and receipt rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RateBand;

/// The portion of a metered quantity charged inside one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCharge {
    /// Units that fell into this band.
    pub units: Decimal,
    /// The band's rate per unit.
    pub rate: Decimal,
    /// `units * rate`.
    pub amount: Decimal,
}

/// Charges `quantity` against `bands` in order, each band taking up to its
/// width before passing the remainder on.
///
/// Returns the total and the per-band charges. Bands that receive no units
/// are omitted.
///
/// # Examples
///
/// ```
/// use travel_reimbursement::calculation::apply_marginal_bands;
/// use travel_reimbursement::config::RateBand;
/// use rust_decimal::Decimal;
///
/// let bands = vec![
///     RateBand { width: Some(Decimal::from(500)), rate: Decimal::new(50, 2) },
///     RateBand { width: None, rate: Decimal::new(30, 2) },
/// ];
///
/// let (total, charges) = apply_marginal_bands(Decimal::from(600), &bands);
/// assert_eq!(total, Decimal::from(280));
/// assert_eq!(charges.len(), 2);
/// ```
pub fn apply_marginal_bands(quantity: Decimal, bands: &[RateBand]) -> (Decimal, Vec<BandCharge>) {
    let mut remaining = quantity;
    let mut total = Decimal::ZERO;
    let mut charges = Vec::new();

    for band in bands {
        if remaining <= Decimal::ZERO {
            break;
        }
        let units = band.width.map_or(remaining, |width| remaining.min(width));
        let amount = units * band.rate;

        total += amount;
        remaining -= units;
        charges.push(BandCharge {
            units,
            rate: band.rate,
            amount,
        });
    }

    (total, charges)
}
