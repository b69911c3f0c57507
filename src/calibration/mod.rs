//! Offline calibration tooling.
//!
//! These routines replay labeled cases (trips with the reimbursement the
//! legacy system actually paid) to judge a constant set or to search for new
//! coefficients. Nothing in [`crate::calculation`] depends on this module.

mod cases;
mod evaluation;
mod search;
mod summary;

pub use cases::{CalibrationCase, CaseInput, load_cases, parse_cases};
pub use evaluation::{
    CLOSE_TOLERANCE, CaseResidual, DEFAULT_WORST_CASES, EXACT_TOLERANCE, EvaluationReport,
    evaluate, rank_configs,
};
pub use search::{
    Coefficient, FeatureSet, LeastSquaresFit, LinearFit, LinearGrid, least_squares_fit,
    linear_grid_search,
};
pub use summary::{CaseSummary, DurationGroup, Range, summarize_cases};
