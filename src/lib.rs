//! Travel-expense reimbursement engine.
//!
//! This crate reproduces a legacy reimbursement rule: given a trip's duration,
//! miles traveled, and receipt total, it computes the amount reimbursed from a
//! per-diem base, tiered mileage, a receipt multiplier, and an efficiency
//! bonus, clamped to a floor and cap and rounded to cents.
//!
//! ```
//! use travel_reimbursement::calculation::ReimbursementCalculator;
//!
//! let calculator = ReimbursementCalculator::legacy();
//! let amount = calculator.compute_str("3", "300", "150").unwrap();
//! assert_eq!(amount.to_string(), "450.00");
//! ```

#![warn(missing_docs)]

pub mod calculation;
pub mod calibration;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
