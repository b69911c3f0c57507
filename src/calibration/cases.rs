//! Labeled case loading.
//!
//! Cases are stored as a JSON array:
//!
//! ```json
//! [
//!   {
//!     "input": {
//!       "trip_duration_days": 3,
//!       "miles_traveled": 93,
//!       "total_receipts_amount": 1.42
//!     },
//!     "expected_output": 364.51
//!   }
//! ]
//! ```

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::TripInput;

/// The trip attributes of a labeled case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseInput {
    /// Trip duration in days.
    pub trip_duration_days: i64,
    /// Total miles traveled.
    pub miles_traveled: Decimal,
    /// Total receipt amount.
    pub total_receipts_amount: Decimal,
}

/// A trip paired with the reimbursement the legacy system paid for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationCase {
    /// The trip attributes.
    pub input: CaseInput,
    /// The observed reimbursement.
    pub expected_output: Decimal,
}

impl CalibrationCase {
    /// Validates the case input as a trip.
    pub fn trip(&self) -> EngineResult<TripInput> {
        TripInput::new(
            self.input.trip_duration_days,
            self.input.miles_traveled,
            self.input.total_receipts_amount,
        )
    }
}

/// Parses cases from JSON text. `source` names the origin in errors.
pub fn parse_cases(json: &str, source: &str) -> EngineResult<Vec<CalibrationCase>> {
    let cases: Vec<CalibrationCase> =
        serde_json::from_str(json).map_err(|e| EngineError::ConfigParseError {
            path: source.to_string(),
            message: e.to_string(),
        })?;

    for (index, case) in cases.iter().enumerate() {
        case.trip().map_err(|err| match err {
            EngineError::InvalidInput { field, message } => EngineError::InvalidInput {
                field: format!("case {}: {}", index, field),
                message,
            },
            other => other,
        })?;
    }

    Ok(cases)
}

/// Loads and validates cases from a JSON file.
///
/// # Errors
///
/// - `ConfigNotFound` if the file cannot be read
/// - `ConfigParseError` if it is not a case array
/// - `InvalidInput` if any case holds an invalid trip
pub fn load_cases<P: AsRef<Path>>(path: P) -> EngineResult<Vec<CalibrationCase>> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;
    let cases = parse_cases(&content, &path_str)?;

    info!(path = %path_str, cases = cases.len(), "Loaded calibration cases");
    Ok(cases)
}
