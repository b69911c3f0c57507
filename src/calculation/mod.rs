//! Calculation logic for the reimbursement engine.
//!
//! This module contains one function per rule (per-diem base, mileage bands,
//! receipt multiplier, efficiency bonus, floor and cap) and the calculator
//! that runs them in order. Each rule returns its amount together with an
//! audit step. The paid amount is re-evaluated in binary floating point and
//! rounded to cents by [`round_to_cents`].

mod binary;
mod calculator;
mod clamp;
mod efficiency;
mod mileage;
mod per_diem;
mod receipts;
mod tiers;

pub use binary::{
    BinaryTerms, CURRENCY_DECIMAL_PLACES, binary_amount, binary_clamp, binary_marginal_bands,
    binary_terms, round_to_cents, to_binary,
};
pub use calculator::{ReimbursementCalculator, calculate_reimbursement, compute};
pub use clamp::{ClampResult, apply_clamp, cap_for};
pub use efficiency::{EfficiencyResult, calculate_efficiency_bonus, select_efficiency_tier};
pub use mileage::{MileageResult, calculate_mileage};
pub use per_diem::{PerDiemResult, calculate_per_diem, select_per_diem_rate};
pub use receipts::{ReceiptResult, calculate_receipts, select_receipt_multiplier};
pub use tiers::{BandCharge, apply_marginal_bands};
