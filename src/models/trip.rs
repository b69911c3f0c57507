//! Trip input model.
//!
//! A [`TripInput`] can only be obtained through its validating constructors,
//! so anything holding one may assume a positive duration and non-negative
//! distances and amounts.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::error::{EngineError, EngineResult};

/// Largest accepted value for miles and receipts.
///
/// Keeps every intermediate product of the rule tables well inside
/// `Decimal`'s range.
pub const MAX_TRIP_QUANTITY: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// The three attributes of a trip submitted for reimbursement.
///
/// # Example
///
/// ```
/// use travel_reimbursement::models::TripInput;
/// use rust_decimal::Decimal;
///
/// let trip = TripInput::parse("3", "300", "150.00").unwrap();
/// assert_eq!(trip.days(), 3);
/// assert_eq!(trip.miles_per_day(), Decimal::from(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TripInput {
    days: u32,
    miles: Decimal,
    receipts: Decimal,
}

impl TripInput {
    /// Creates a validated trip.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if `days <= 0`, `miles < 0`,
    /// `receipts < 0`, or a value is too large to reimburse.
    pub fn new(days: i64, miles: Decimal, receipts: Decimal) -> EngineResult<Self> {
        if days <= 0 {
            return Err(reject("days", format!("must be at least 1 (got {})", days)));
        }
        let days = u32::try_from(days)
            .map_err(|_| reject("days", format!("is too large (got {})", days)))?;

        check_quantity("miles", miles)?;
        check_quantity("receipts", receipts)?;

        Ok(Self {
            days,
            miles,
            receipts,
        })
    }

    /// Parses and validates a trip from its textual form.
    ///
    /// `days` must be an integer; `miles` and `receipts` accept plain or
    /// scientific decimal notation. Surrounding whitespace is ignored.
    pub fn parse(days: &str, miles: &str, receipts: &str) -> EngineResult<Self> {
        let days = days
            .trim()
            .parse::<i64>()
            .map_err(|_| reject("days", format!("'{}' is not an integer", days.trim())))?;
        let miles = parse_decimal("miles", miles)?;
        let receipts = parse_decimal("receipts", receipts)?;

        Self::new(days, miles, receipts)
    }

    /// Trip duration in days.
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Total miles traveled.
    pub fn miles(&self) -> Decimal {
        self.miles
    }

    /// Total receipt amount.
    pub fn receipts(&self) -> Decimal {
        self.receipts
    }

    /// Miles traveled per trip day.
    pub fn miles_per_day(&self) -> Decimal {
        per_day(self.miles, self.days)
    }

    /// Receipt amount per trip day.
    pub fn receipts_per_day(&self) -> Decimal {
        per_day(self.receipts, self.days)
    }
}

/// Divides `quantity` by `days`, yielding zero for a zero-day trip.
pub fn per_day(quantity: Decimal, days: u32) -> Decimal {
    if days == 0 {
        Decimal::ZERO
    } else {
        quantity / Decimal::from(days)
    }
}

fn reject(field: &str, message: String) -> EngineError {
    warn!(field, %message, "Rejected trip input");
    EngineError::invalid_input(field, message)
}

fn check_quantity(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(reject(field, format!("must not be negative (got {})", value)));
    }
    if value > MAX_TRIP_QUANTITY {
        return Err(reject(
            field,
            format!("must not exceed {} (got {})", MAX_TRIP_QUANTITY, value),
        ));
    }
    Ok(())
}

fn parse_decimal(field: &str, raw: &str) -> EngineResult<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| reject(field, format!("'{}' is not a number", trimmed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn field_of(err: EngineError) -> String {
        match err {
            EngineError::InvalidInput { field, .. } => field,
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_new_accepts_valid_trip() {
        let trip = TripInput::new(5, dec("250.5"), dec("120.75")).unwrap();

        assert_eq!(trip.days(), 5);
        assert_eq!(trip.miles(), dec("250.5"));
        assert_eq!(trip.receipts(), dec("120.75"));
    }

    #[test]
    fn test_zero_days_rejected() {
        let err = TripInput::new(0, dec("10"), dec("10")).unwrap_err();
        assert_eq!(field_of(err), "days");
    }

    #[test]
    fn test_negative_days_rejected() {
        let err = TripInput::new(-2, dec("10"), dec("10")).unwrap_err();
        assert!(err.to_string().contains("must be at least 1"));
    }

    #[test]
    fn test_negative_miles_rejected() {
        let err = TripInput::new(1, dec("-0.01"), dec("10")).unwrap_err();
        assert_eq!(field_of(err), "miles");
    }

    #[test]
    fn test_negative_receipts_rejected() {
        let err = TripInput::new(1, dec("10"), dec("-5")).unwrap_err();
        assert_eq!(field_of(err), "receipts");
    }

    #[test]
    fn test_zero_miles_and_receipts_accepted() {
        assert!(TripInput::new(1, Decimal::ZERO, Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_max_trip_quantity_is_one_trillion() {
        assert_eq!(MAX_TRIP_QUANTITY, Decimal::from(1_000_000_000_000_i64));
        assert_eq!(MAX_TRIP_QUANTITY.scale(), 0);
    }

    #[test]
    fn test_quantity_at_limit_accepted() {
        let trip = TripInput::new(1, MAX_TRIP_QUANTITY, MAX_TRIP_QUANTITY).unwrap();
        assert_eq!(trip.miles(), MAX_TRIP_QUANTITY);
    }

    #[test]
    fn test_oversized_quantity_rejected() {
        let too_far = MAX_TRIP_QUANTITY + Decimal::ONE;
        let err = TripInput::new(1, too_far, Decimal::ZERO).unwrap_err();
        assert!(err.to_string().contains("must not exceed"));
    }

    #[test]
    fn test_days_beyond_u32_rejected() {
        let err = TripInput::new(i64::from(u32::MAX) + 1, Decimal::ZERO, Decimal::ZERO)
            .unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let trip = TripInput::parse(" 3 ", " 93 ", " 1.42\n").unwrap();

        assert_eq!(trip.days(), 3);
        assert_eq!(trip.miles(), dec("93"));
        assert_eq!(trip.receipts(), dec("1.42"));
    }

    #[test]
    fn test_parse_accepts_scientific_notation() {
        let trip = TripInput::parse("2", "1.5e2", "1e1").unwrap();

        assert_eq!(trip.miles(), dec("150"));
        assert_eq!(trip.receipts(), dec("10"));
    }

    #[test]
    fn test_parse_rejects_fractional_days() {
        let err = TripInput::parse("2.5", "10", "10").unwrap_err();
        assert_eq!(field_of(err), "days");
    }

    #[test]
    fn test_parse_rejects_non_numeric_miles() {
        let err = TripInput::parse("2", "far", "10").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input 'miles': 'far' is not a number");
    }

    #[test]
    fn test_parse_rejects_non_numeric_receipts() {
        let err = TripInput::parse("2", "10", "").unwrap_err();
        assert_eq!(field_of(err), "receipts");
    }

    #[test]
    fn test_per_day_ratios() {
        let trip = TripInput::new(4, dec("500"), dec("130")).unwrap();

        assert_eq!(trip.miles_per_day(), dec("125"));
        assert_eq!(trip.receipts_per_day(), dec("32.5"));
    }

    #[test]
    fn test_per_day_guards_zero_days() {
        assert_eq!(per_day(dec("500"), 0), Decimal::ZERO);
    }
}
