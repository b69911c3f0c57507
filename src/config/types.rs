//! Configuration types for reimbursement calculation.
//!
//! This module contains the strongly-typed rule tables that are deserialized
//! from YAML configuration files. Every rate, threshold, and clamp coefficient
//! the calculator uses lives here, so recalibrating never touches control flow.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Descriptive metadata for a calibrated constant set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Short identifier (e.g., "legacy").
    pub name: String,
    /// Free-form description of where the constants came from.
    #[serde(default)]
    pub description: String,
}

/// A per-diem bracket selected by trip length.
///
/// Tiers are evaluated top-down; the first whose `max_days` is at least the
/// trip length wins. A tier with no `max_days` matches every length and must
/// be last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerDiemTier {
    /// Longest trip (inclusive) this tier applies to.
    #[serde(default)]
    pub max_days: Option<u32>,
    /// Allowance paid for each day of the trip.
    pub daily_rate: Decimal,
}

/// Per-diem configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerDiemConfig {
    /// Ordered per-diem brackets.
    pub tiers: Vec<PerDiemTier>,
}

/// A marginal rate band.
///
/// Bands are consumed in order: each takes up to `width` units of the metered
/// quantity at `rate`, passing the remainder on. A band with no `width` takes
/// everything left and must be last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBand {
    /// Number of units this band covers.
    #[serde(default)]
    pub width: Option<Decimal>,
    /// Rate per unit inside this band.
    pub rate: Decimal,
}

/// Mileage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileageConfig {
    /// Ordered marginal mileage bands.
    pub bands: Vec<RateBand>,
}

/// Direction of a receipts-per-day comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Matches when receipts-per-day is strictly greater than the threshold.
    Above,
    /// Matches when receipts-per-day is strictly less than the threshold.
    Below,
}

impl Comparison {
    /// Returns true if `value` satisfies this comparison against `threshold`.
    pub fn matches(self, value: Decimal, threshold: Decimal) -> bool {
        match self {
            Comparison::Above => value > threshold,
            Comparison::Below => value < threshold,
        }
    }
}

/// A receipt multiplier selected by receipts-per-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptTier {
    /// How receipts-per-day is compared to `per_day`.
    pub comparison: Comparison,
    /// Receipts-per-day threshold.
    pub per_day: Decimal,
    /// Multiplier applied to the full receipt total when this tier matches.
    pub multiplier: Decimal,
}

/// How the receipt component is derived from the receipt total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReceiptSchedule {
    /// One multiplier, chosen by receipts-per-day, applied to the whole total.
    PerDayMultiplier {
        /// Ordered tiers, first match wins.
        tiers: Vec<ReceiptTier>,
        /// Multiplier used when no tier matches.
        default_multiplier: Decimal,
    },
    /// Marginal bands over the absolute receipt total.
    Marginal {
        /// Ordered marginal receipt bands.
        bands: Vec<RateBand>,
    },
}

/// A miles-per-day bonus bracket.
///
/// Tiers are evaluated top-down; the first whose threshold is exceeded pays
/// `(miles_per_day - threshold) * rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfficiencyTier {
    /// Miles-per-day that must be exceeded.
    pub threshold_miles_per_day: Decimal,
    /// Bonus per mile-per-day above the threshold.
    pub rate: Decimal,
}

/// Efficiency bonus configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfficiencyConfig {
    /// Ordered bonus brackets. Empty means no bonus.
    #[serde(default)]
    pub tiers: Vec<EfficiencyTier>,
}

/// Upper bound coefficients: `days * per_day + receipts * receipts_factor + miles * miles_factor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapConfig {
    /// Cap contribution per trip day.
    pub per_day: Decimal,
    /// Cap contribution per unit of receipts.
    pub receipts_factor: Decimal,
    /// Cap contribution per mile.
    pub miles_factor: Decimal,
}

/// Floor and cap applied to the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampConfig {
    /// Minimum reimbursement per trip day.
    pub floor_per_day: Decimal,
    /// Optional upper bound.
    #[serde(default)]
    pub cap: Option<CapConfig>,
}

/// The complete set of calibrated constants for the calculator.
///
/// [`Default`] yields the legacy constant set; `config/legacy.yaml` holds the
/// same values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReimbursementConfig {
    /// Descriptive metadata.
    pub metadata: ConfigMetadata,
    /// Per-diem brackets.
    pub per_diem: PerDiemConfig,
    /// Mileage bands.
    pub mileage: MileageConfig,
    /// Receipt schedule.
    pub receipts: ReceiptSchedule,
    /// Efficiency bonus brackets.
    #[serde(default = "EfficiencyConfig::none")]
    pub efficiency: EfficiencyConfig,
    /// Floor and cap.
    pub clamp: ClampConfig,
}

impl EfficiencyConfig {
    fn none() -> Self {
        Self { tiers: Vec::new() }
    }
}

impl Default for ReimbursementConfig {
    fn default() -> Self {
        Self {
            metadata: ConfigMetadata {
                name: "legacy".to_string(),
                description: "Constants of the production reimbursement calculator".to_string(),
            },
            per_diem: PerDiemConfig {
                tiers: vec![
                    PerDiemTier {
                        max_days: Some(1),
                        daily_rate: Decimal::from(90),
                    },
                    PerDiemTier {
                        max_days: Some(10),
                        daily_rate: Decimal::from(75),
                    },
                    PerDiemTier {
                        max_days: None,
                        daily_rate: Decimal::from(65),
                    },
                ],
            },
            mileage: MileageConfig {
                bands: vec![
                    RateBand {
                        width: Some(Decimal::from(500)),
                        rate: Decimal::new(50, 2),
                    },
                    RateBand {
                        width: None,
                        rate: Decimal::new(30, 2),
                    },
                ],
            },
            receipts: ReceiptSchedule::PerDayMultiplier {
                tiers: vec![
                    ReceiptTier {
                        comparison: Comparison::Above,
                        per_day: Decimal::from(300),
                        multiplier: Decimal::new(2, 1),
                    },
                    ReceiptTier {
                        comparison: Comparison::Above,
                        per_day: Decimal::from(150),
                        multiplier: Decimal::new(4, 1),
                    },
                    ReceiptTier {
                        comparison: Comparison::Below,
                        per_day: Decimal::from(50),
                        multiplier: Decimal::new(6, 1),
                    },
                ],
                default_multiplier: Decimal::new(5, 1),
            },
            efficiency: EfficiencyConfig {
                tiers: vec![EfficiencyTier {
                    threshold_miles_per_day: Decimal::from(100),
                    rate: Decimal::new(3, 1),
                }],
            },
            clamp: ClampConfig {
                floor_per_day: Decimal::from(60),
                cap: Some(CapConfig {
                    per_day: Decimal::from(300),
                    receipts_factor: Decimal::new(15, 1),
                    miles_factor: Decimal::from(2),
                }),
            },
        }
    }
}

impl ReimbursementConfig {
    /// Checks that every rule table is usable by the calculator.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] naming the first problem found.
    pub fn validate(&self) -> EngineResult<()> {
        validate_per_diem(&self.per_diem.tiers)?;
        validate_bands("mileage", &self.mileage.bands)?;

        match &self.receipts {
            ReceiptSchedule::PerDayMultiplier {
                tiers,
                default_multiplier,
            } => {
                non_negative("receipts default_multiplier", *default_multiplier)?;
                for tier in tiers {
                    non_negative("receipts per_day", tier.per_day)?;
                    non_negative("receipts multiplier", tier.multiplier)?;
                }
            }
            ReceiptSchedule::Marginal { bands } => validate_bands("receipts", bands)?,
        }

        for tier in &self.efficiency.tiers {
            non_negative("efficiency threshold", tier.threshold_miles_per_day)?;
            non_negative("efficiency rate", tier.rate)?;
        }

        non_negative("floor_per_day", self.clamp.floor_per_day)?;
        if let Some(cap) = &self.clamp.cap {
            non_negative("cap per_day", cap.per_day)?;
            non_negative("cap receipts_factor", cap.receipts_factor)?;
            non_negative("cap miles_factor", cap.miles_factor)?;
        }

        Ok(())
    }
}

fn non_negative(name: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::invalid_config(format!(
            "{} must not be negative (got {})",
            name, value
        )));
    }
    Ok(())
}

fn validate_per_diem(tiers: &[PerDiemTier]) -> EngineResult<()> {
    let Some((last, bounded)) = tiers.split_last() else {
        return Err(EngineError::invalid_config("per-diem tiers must not be empty"));
    };
    if last.max_days.is_some() {
        return Err(EngineError::invalid_config(
            "last per-diem tier must have no max_days",
        ));
    }

    let mut previous: Option<u32> = None;
    for tier in bounded {
        let Some(max_days) = tier.max_days else {
            return Err(EngineError::invalid_config(
                "only the last per-diem tier may omit max_days",
            ));
        };
        if previous.is_some_and(|p| max_days <= p) {
            return Err(EngineError::invalid_config(format!(
                "per-diem max_days must increase (got {} after {})",
                max_days,
                previous.unwrap_or_default()
            )));
        }
        previous = Some(max_days);
    }

    for tier in tiers {
        non_negative("per-diem daily_rate", tier.daily_rate)?;
    }
    Ok(())
}

fn validate_bands(name: &str, bands: &[RateBand]) -> EngineResult<()> {
    let Some((last, bounded)) = bands.split_last() else {
        return Err(EngineError::invalid_config(format!(
            "{} bands must not be empty",
            name
        )));
    };
    if last.width.is_some() {
        return Err(EngineError::invalid_config(format!(
            "last {} band must have no width",
            name
        )));
    }

    for band in bounded {
        match band.width {
            Some(width) if width > Decimal::ZERO => {}
            Some(width) => {
                return Err(EngineError::invalid_config(format!(
                    "{} band width must be positive (got {})",
                    name, width
                )));
            }
            None => {
                return Err(EngineError::invalid_config(format!(
                    "only the last {} band may omit width",
                    name
                )));
            }
        }
    }

    for band in bands {
        non_negative(&format!("{} rate", name), band.rate)?;
    }
    Ok(())
}
