//! Coefficient search over labeled cases.
//!
//! Two routines look for simple closed forms that approximate the legacy
//! outputs:
//!
//! - [`linear_grid_search`] tries every combination of a per-day rate, a
//!   receipt multiplier, and a mileage rate from a fixed grid.
//! - [`least_squares_fit`] solves the normal equations for a linear or
//!   quadratic feature set.
//!
//! Neither is used by the calculator; their output is for a human choosing
//! new constants.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::cases::CalibrationCase;

/// Candidate values for the linear grid search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearGrid {
    /// Candidate per-day rates.
    pub base_rates: Vec<Decimal>,
    /// Candidate receipt multipliers.
    pub receipt_multipliers: Vec<Decimal>,
    /// Candidate per-mile rates.
    pub mile_rates: Vec<Decimal>,
}

impl Default for LinearGrid {
    /// Per-day 50..=175 step 25, receipts 0.4..=1.0 step 0.1, miles 0..=1.0 step 0.25.
    fn default() -> Self {
        Self {
            base_rates: (50..200).step_by(25).map(Decimal::from).collect(),
            receipt_multipliers: (4..=10).map(|m| Decimal::new(m, 1)).collect(),
            mile_rates: (0..=4).map(|m| Decimal::new(m * 25, 2)).collect(),
        }
    }
}

/// The best grid point found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinearFit {
    /// Per-day rate.
    pub base_rate: Decimal,
    /// Receipt multiplier.
    pub receipt_multiplier: Decimal,
    /// Per-mile rate.
    pub mile_rate: Decimal,
    /// Mean absolute error over the cases, rounded to cents.
    pub average_error: Decimal,
    /// Number of grid points tried.
    pub candidates_tried: usize,
}

/// Finds the grid point minimising mean absolute error of
/// `base_rate * days + receipt_multiplier * receipts + mile_rate * miles`.
///
/// Ties keep the first point in grid order.
///
/// # Errors
///
/// `CalibrationError` if `cases` or any grid axis is empty.
pub fn linear_grid_search(cases: &[CalibrationCase], grid: &LinearGrid) -> EngineResult<LinearFit> {
    if cases.is_empty() {
        return Err(calibration_error("no cases to search over"));
    }
    if grid.base_rates.is_empty() || grid.receipt_multipliers.is_empty() || grid.mile_rates.is_empty()
    {
        return Err(calibration_error("every grid axis needs at least one value"));
    }

    let mut best: Option<(Decimal, Decimal, Decimal, Decimal)> = None;
    let mut candidates_tried = 0;

    for &base_rate in &grid.base_rates {
        for &receipt_multiplier in &grid.receipt_multipliers {
            for &mile_rate in &grid.mile_rates {
                candidates_tried += 1;
                let total_error: Decimal = cases
                    .iter()
                    .map(|case| {
                        let predicted = base_rate * Decimal::from(case.input.trip_duration_days)
                            + receipt_multiplier * case.input.total_receipts_amount
                            + mile_rate * case.input.miles_traveled;
                        (predicted - case.expected_output).abs()
                    })
                    .sum();

                if best.is_none_or(|(_, _, _, best_error)| total_error < best_error) {
                    best = Some((base_rate, receipt_multiplier, mile_rate, total_error));
                }
            }
        }
    }

    let Some((base_rate, receipt_multiplier, mile_rate, total_error)) = best else {
        return Err(calibration_error("grid search produced no candidate"));
    };
    let average_error = (total_error / Decimal::from(cases.len())).round_dp(2);

    info!(
        base_rate = %base_rate,
        receipt_multiplier = %receipt_multiplier,
        mile_rate = %mile_rate,
        average_error = %average_error,
        candidates_tried,
        "Linear grid search finished"
    );

    Ok(LinearFit {
        base_rate,
        receipt_multiplier,
        mile_rate,
        average_error,
        candidates_tried,
    })
}

/// Feature sets available to [`least_squares_fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    /// days, miles, receipts, constant.
    Linear,
    /// Linear terms, their squares, pairwise products, constant.
    Quadratic,
}

impl FeatureSet {
    /// Names of the features, in coefficient order.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            FeatureSet::Linear => &["days", "miles", "receipts", "constant"],
            FeatureSet::Quadratic => &[
                "days",
                "miles",
                "receipts",
                "days^2",
                "miles^2",
                "receipts^2",
                "days*miles",
                "days*receipts",
                "miles*receipts",
                "constant",
            ],
        }
    }

    fn row(self, days: f64, miles: f64, receipts: f64) -> Vec<f64> {
        match self {
            FeatureSet::Linear => vec![days, miles, receipts, 1.0],
            FeatureSet::Quadratic => vec![
                days,
                miles,
                receipts,
                days * days,
                miles * miles,
                receipts * receipts,
                days * miles,
                days * receipts,
                miles * receipts,
                1.0,
            ],
        }
    }
}

/// A fitted coefficient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    /// Feature name.
    pub feature: String,
    /// Fitted weight.
    pub value: f64,
}

/// Result of an ordinary least-squares fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeastSquaresFit {
    /// Feature set used.
    pub features: FeatureSet,
    /// One coefficient per feature.
    pub coefficients: Vec<Coefficient>,
    /// Mean absolute error of the fitted model over the cases.
    pub average_error: f64,
}

impl LeastSquaresFit {
    /// Evaluates the fitted model for one trip.
    pub fn predict(&self, days: f64, miles: f64, receipts: f64) -> f64 {
        self.features
            .row(days, miles, receipts)
            .iter()
            .zip(&self.coefficients)
            .map(|(x, c)| x * c.value)
            .sum()
    }
}

/// Fits `features` to the expected outputs by ordinary least squares.
///
/// # Errors
///
/// `CalibrationError` if there are fewer cases than features or the normal
/// equations are singular.
pub fn least_squares_fit(
    cases: &[CalibrationCase],
    features: FeatureSet,
) -> EngineResult<LeastSquaresFit> {
    let width = features.names().len();
    if cases.len() < width {
        return Err(calibration_error(format!(
            "{} cases cannot determine {} coefficients",
            cases.len(),
            width
        )));
    }

    let samples = cases
        .iter()
        .map(|case| {
            let row = features.row(
                to_f64(Decimal::from(case.input.trip_duration_days))?,
                to_f64(case.input.miles_traveled)?,
                to_f64(case.input.total_receipts_amount)?,
            );
            Ok((row, to_f64(case.expected_output)?))
        })
        .collect::<EngineResult<Vec<_>>>()?;

    // Normal equations: (XᵀX) β = Xᵀy
    let mut xtx = vec![vec![0.0; width]; width];
    let mut xty = vec![0.0; width];
    for (row, target) in &samples {
        for i in 0..width {
            xty[i] += row[i] * target;
            for j in 0..width {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    let solution = solve_normal_equations(xtx, xty)?;
    let coefficients = features
        .names()
        .iter()
        .zip(solution)
        .map(|(name, value)| Coefficient {
            feature: name.to_string(),
            value,
        })
        .collect();

    let mut fit = LeastSquaresFit {
        features,
        coefficients,
        average_error: 0.0,
    };
    let total_error: f64 = samples
        .iter()
        .map(|(row, target)| {
            let predicted: f64 = row.iter().zip(&fit.coefficients).map(|(x, c)| x * c.value).sum();
            (predicted - target).abs()
        })
        .sum();
    fit.average_error = total_error / samples.len() as f64;

    info!(
        features = ?features,
        average_error = fit.average_error,
        "Least-squares fit finished"
    );

    Ok(fit)
}

/// Smallest pivot, relative to its column's original diagonal, treated as
/// non-singular.
const SINGULAR_PIVOT_RATIO: f64 = 1e-10;

/// Solves the symmetric positive semi-definite system `a x = b` by Gaussian
/// elimination.
///
/// Each pivot is the part of its feature not explained by the earlier ones,
/// so a pivot that vanishes relative to the original diagonal marks a
/// collinear feature.
fn solve_normal_equations(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> EngineResult<Vec<f64>> {
    let n = b.len();
    let diagonal: Vec<f64> = (0..n).map(|i| a[i][i]).collect();

    for col in 0..n {
        let pivot = a[col][col];
        if pivot <= SINGULAR_PIVOT_RATIO * diagonal[col] || pivot <= 0.0 {
            return Err(calibration_error(
                "normal equations are singular; features are collinear over these cases",
            ));
        }

        for row in col + 1..n {
            let factor = a[row][col] / pivot;
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

fn to_f64(value: Decimal) -> EngineResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| calibration_error(format!("{} is not representable as f64", value)))
}

fn calibration_error(message: impl Into<String>) -> EngineError {
    EngineError::CalibrationError {
        message: message.into(),
    }
}
