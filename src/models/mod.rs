//! Core data models for the reimbursement engine.
//!
//! This module contains the trip input and the calculation result types.

mod calculation_result;
mod trip;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, ClampOutcome, ReimbursementBreakdown,
    ReimbursementResult,
};
pub use trip::{MAX_TRIP_QUANTITY, TripInput, per_day};
