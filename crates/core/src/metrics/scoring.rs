//! Acquisition fit score (0-100).
//!
//! The score sums four independent components:
//! - growth (30): 3-year revenue CAGR, linear between `growth_floor` and `growth_ceiling`
//! - profitability (30): EBIT margin, linear between `margin_floor` and `margin_ceiling`
//! - size (20): headcount inside the target band, half points just outside it
//! - revenue (20): latest revenue inside the target band, half points just outside it
//!
//! Missing inputs score zero for their component.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::metrics::categorization::CategoryThresholds;

const GROWTH_POINTS: f64 = 30.0;
const PROFITABILITY_POINTS: f64 = 30.0;
const SIZE_POINTS: f64 = 20.0;
const REVENUE_POINTS: f64 = 20.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FitScoreConfig {
    pub growth_floor: f64,
    pub growth_ceiling: f64,
    pub margin_floor: f64,
    pub margin_ceiling: f64,
    pub target_min_employees: i32,
    pub target_max_employees: i32,
    /// SEK
    pub target_min_revenue: f64,
    /// SEK
    pub target_max_revenue: f64,
}

impl Default for FitScoreConfig {
    fn default() -> Self {
        Self {
            growth_floor: -0.10,
            growth_ceiling: 0.30,
            margin_floor: -0.05,
            margin_ceiling: 0.20,
            target_min_employees: 10,
            target_max_employees: 249,
            target_min_revenue: 10_000_000.0,
            target_max_revenue: 500_000_000.0,
        }
    }
}

/// Category thresholds and fit score parameters, loadable from JSON.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringConfig {
    pub thresholds: CategoryThresholds,
    pub fit: FitScoreConfig,
}

impl ScoringConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        let config: ScoringConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::InvalidConfigValue(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        let f = &self.fit;
        if !(f.growth_floor < f.growth_ceiling && f.margin_floor < f.margin_ceiling) {
            return Err(ValidationError::InvalidInput(
                "fit score floors must be below their ceilings".to_string(),
            )
            .into());
        }
        if !(0 < f.target_min_employees && f.target_min_employees <= f.target_max_employees) {
            return Err(ValidationError::InvalidInput(
                "fit score employee band must satisfy 0 < min <= max".to_string(),
            )
            .into());
        }
        if !(0.0 < f.target_min_revenue && f.target_min_revenue <= f.target_max_revenue) {
            return Err(ValidationError::InvalidInput(
                "fit score revenue band must satisfy 0 < min <= max".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

/// Inputs to the fit score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FitInputs {
    pub revenue_cagr: Option<f64>,
    pub ebit_margin: Option<f64>,
    pub employees: Option<i32>,
    pub revenue: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FitScore {
    pub total: i32,
    pub growth: f64,
    pub profitability: f64,
    pub size: f64,
    pub revenue: f64,
}

pub fn fit_score(inputs: &FitInputs, config: &FitScoreConfig) -> FitScore {
    let growth = inputs
        .revenue_cagr
        .map(|v| linear_points(v, config.growth_floor, config.growth_ceiling, GROWTH_POINTS))
        .unwrap_or(0.0);
    let profitability = inputs
        .ebit_margin
        .map(|v| {
            linear_points(
                v,
                config.margin_floor,
                config.margin_ceiling,
                PROFITABILITY_POINTS,
            )
        })
        .unwrap_or(0.0);
    let size = inputs
        .employees
        .map(|n| {
            band_points(
                f64::from(n),
                f64::from(config.target_min_employees),
                f64::from(config.target_max_employees),
                SIZE_POINTS,
            )
        })
        .unwrap_or(0.0);
    let revenue = inputs
        .revenue
        .map(|r| {
            band_points(
                r,
                config.target_min_revenue,
                config.target_max_revenue,
                REVENUE_POINTS,
            )
        })
        .unwrap_or(0.0);

    let raw = growth + profitability + size + revenue;
    let total = if raw.is_finite() {
        raw.round().clamp(0.0, 100.0) as i32
    } else {
        0
    };

    FitScore {
        total,
        growth,
        profitability,
        size,
        revenue,
    }
}

fn linear_points(value: f64, floor: f64, ceiling: f64, points: f64) -> f64 {
    if !value.is_finite() || ceiling <= floor {
        return 0.0;
    }
    ((value - floor) / (ceiling - floor)).clamp(0.0, 1.0) * points
}

/// Full points inside `[min, max]`, half points in `[min / 2, min)` and
/// `(max, 2 * max]`.
fn band_points(value: f64, min: f64, max: f64, points: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if value >= min && value <= max {
        points
    } else if (value >= min / 2.0 && value < min) || (value > max && value <= max * 2.0) {
        points / 2.0
    } else {
        0.0
    }
}
