//! Descriptive statistics over a case set.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

use super::cases::CalibrationCase;

/// Smallest and largest observed value of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Range {
    /// Smallest value.
    pub min: Decimal,
    /// Largest value.
    pub max: Decimal,
}

impl Range {
    fn of(values: impl Iterator<Item = Decimal>) -> Option<Self> {
        values.fold(None, |range, value| match range {
            None => Some(Range {
                min: value,
                max: value,
            }),
            Some(Range { min, max }) => Some(Range {
                min: min.min(value),
                max: max.max(value),
            }),
        })
    }
}

/// Statistics for all cases of one trip length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationGroup {
    /// Number of cases.
    pub count: usize,
    /// Mean expected reimbursement.
    pub mean_reimbursement: Decimal,
    /// Mean expected reimbursement divided by days.
    pub mean_per_day: Decimal,
    /// Mean miles traveled.
    pub mean_miles: Decimal,
    /// Mean receipt total.
    pub mean_receipts: Decimal,
}

/// Overview of a case set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseSummary {
    /// Number of cases.
    pub case_count: usize,
    /// Range of trip lengths.
    pub days: Range,
    /// Range of miles traveled.
    pub miles: Range,
    /// Range of receipt totals.
    pub receipts: Range,
    /// Range of expected reimbursements.
    pub reimbursement: Range,
    /// Statistics keyed by trip length.
    pub by_duration: BTreeMap<i64, DurationGroup>,
}

/// Summarises `cases`. Means are rounded to cents.
///
/// # Errors
///
/// `CalibrationError` if `cases` is empty.
pub fn summarize_cases(cases: &[CalibrationCase]) -> EngineResult<CaseSummary> {
    let empty = || EngineError::CalibrationError {
        message: "no cases to summarize".to_string(),
    };

    let days = Range::of(cases.iter().map(|c| Decimal::from(c.input.trip_duration_days)))
        .ok_or_else(empty)?;
    let miles = Range::of(cases.iter().map(|c| c.input.miles_traveled)).ok_or_else(empty)?;
    let receipts =
        Range::of(cases.iter().map(|c| c.input.total_receipts_amount)).ok_or_else(empty)?;
    let reimbursement = Range::of(cases.iter().map(|c| c.expected_output)).ok_or_else(empty)?;

    let mut grouped: BTreeMap<i64, Vec<&CalibrationCase>> = BTreeMap::new();
    for case in cases {
        grouped
            .entry(case.input.trip_duration_days)
            .or_default()
            .push(case);
    }

    let by_duration = grouped
        .into_iter()
        .map(|(trip_days, group)| {
            let count = Decimal::from(group.len());
            let mean = |f: fn(&CalibrationCase) -> Decimal| {
                (group.iter().map(|c| f(c)).sum::<Decimal>() / count).round_dp(2)
            };
            let mean_reimbursement = mean(|c| c.expected_output);
            let mean_per_day = if trip_days > 0 {
                mean(|c| c.expected_output / Decimal::from(c.input.trip_duration_days))
            } else {
                Decimal::ZERO
            };

            (
                trip_days,
                DurationGroup {
                    count: group.len(),
                    mean_reimbursement,
                    mean_per_day,
                    mean_miles: mean(|c| c.input.miles_traveled),
                    mean_receipts: mean(|c| c.input.total_receipts_amount),
                },
            )
        })
        .collect();

    Ok(CaseSummary {
        case_count: cases.len(),
        days,
        miles,
        receipts,
        reimbursement,
        by_duration,
    })
}
