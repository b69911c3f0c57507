//! Replaying labeled cases through a calculator.
//!
//! A case is an exact match when the computed amount is within one cent of
//! the expected output, and a close match within one dollar. The score
//! penalises average error and every inexact case; lower is better.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::calculation::ReimbursementCalculator;
use crate::config::ReimbursementConfig;
use crate::error::{EngineError, EngineResult};

use super::cases::CalibrationCase;

/// Error below which a case counts as an exact match.
pub const EXACT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Error below which a case counts as a close match.
pub const CLOSE_TOLERANCE: Decimal = Decimal::ONE;

/// Number of worst residuals kept in a report by default.
pub const DEFAULT_WORST_CASES: usize = 5;

/// One case's computed amount and error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseResidual {
    /// Position of the case in the input.
    pub index: usize,
    /// Trip duration in days.
    pub days: u32,
    /// Miles traveled.
    pub miles: Decimal,
    /// Receipt total.
    pub receipts: Decimal,
    /// The observed reimbursement.
    pub expected: Decimal,
    /// The computed reimbursement.
    pub actual: Decimal,
    /// `|actual - expected|`.
    pub error: Decimal,
}

/// Fit quality of a calculator over a case set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationReport {
    /// Name of the constant set evaluated.
    pub config_name: String,
    /// Number of cases replayed.
    pub case_count: usize,
    /// Cases within [`EXACT_TOLERANCE`].
    pub exact_matches: usize,
    /// Cases within [`CLOSE_TOLERANCE`].
    pub close_matches: usize,
    /// Mean absolute error, rounded to cents.
    pub average_error: Decimal,
    /// Largest absolute error.
    pub max_error: Decimal,
    /// `average_error * 100 + (case_count - exact_matches) * 0.1`.
    pub score: Decimal,
    /// The largest residuals, worst first.
    pub worst_cases: Vec<CaseResidual>,
}

/// Replays every case through `calculator`.
///
/// # Errors
///
/// `CalibrationError` if `cases` is empty; `InvalidInput` if a case holds an
/// invalid trip.
pub fn evaluate(
    calculator: &ReimbursementCalculator,
    cases: &[CalibrationCase],
    worst: usize,
) -> EngineResult<EvaluationReport> {
    if cases.is_empty() {
        return Err(EngineError::CalibrationError {
            message: "no cases to evaluate".to_string(),
        });
    }

    let mut residuals = Vec::with_capacity(cases.len());
    for (index, case) in cases.iter().enumerate() {
        let trip = case.trip()?;
        let actual = calculator.calculate(&trip).amount;
        residuals.push(CaseResidual {
            index,
            days: trip.days(),
            miles: trip.miles(),
            receipts: trip.receipts(),
            expected: case.expected_output,
            actual,
            error: (actual - case.expected_output).abs(),
        });
    }

    let case_count = residuals.len();
    let exact_matches = residuals.iter().filter(|r| r.error < EXACT_TOLERANCE).count();
    let close_matches = residuals.iter().filter(|r| r.error < CLOSE_TOLERANCE).count();
    let total_error: Decimal = residuals.iter().map(|r| r.error).sum();
    let average_error = (total_error / Decimal::from(case_count)).round_dp(2);
    let max_error = residuals
        .iter()
        .map(|r| r.error)
        .max()
        .unwrap_or(Decimal::ZERO);
    let score = average_error * Decimal::from(100)
        + Decimal::from(case_count - exact_matches) * Decimal::new(1, 1);

    residuals.sort_by(|a, b| b.error.cmp(&a.error).then(a.index.cmp(&b.index)));
    residuals.truncate(worst);

    let config_name = calculator.config().metadata.name.clone();
    info!(
        config = %config_name,
        case_count,
        exact_matches,
        close_matches,
        average_error = %average_error,
        score = %score,
        "Evaluated calibration cases"
    );

    Ok(EvaluationReport {
        config_name,
        case_count,
        exact_matches,
        close_matches,
        average_error,
        max_error,
        score,
        worst_cases: residuals,
    })
}

/// Evaluates several constant sets and sorts them best score first.
///
/// # Errors
///
/// Fails on the first invalid configuration or case.
pub fn rank_configs(
    configs: Vec<ReimbursementConfig>,
    cases: &[CalibrationCase],
    worst: usize,
) -> EngineResult<Vec<EvaluationReport>> {
    let mut reports = configs
        .into_iter()
        .map(|config| evaluate(&ReimbursementCalculator::new(config)?, cases, worst))
        .collect::<EngineResult<Vec<_>>>()?;

    reports.sort_by(|a, b| a.score.cmp(&b.score));
    Ok(reports)
}
