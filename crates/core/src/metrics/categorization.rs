//! Threshold rules mapping a ratio or headcount to a category label.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::metrics::metrics_model::{GrowthCategory, ProfitabilityCategory, SizeCategory};

/// Ordered `(lower bound, label)` rules. The first rule whose bound is
/// `<= value` wins; values below every bound get `below`.
#[derive(Debug, Clone)]
pub struct RuleTable<L> {
    rules: Vec<(f64, L)>,
    below: L,
}

impl<L: Copy> RuleTable<L> {
    /// Rules are sorted by bound, highest first.
    pub fn new(mut rules: Vec<(f64, L)>, below: L) -> Self {
        rules.sort_by(|a, b| b.0.total_cmp(&a.0));
        Self { rules, below }
    }

    pub fn classify(&self, value: f64) -> L {
        self.rules
            .iter()
            .find(|(bound, _)| value >= *bound)
            .map(|(_, label)| *label)
            .unwrap_or(self.below)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SizeThresholds {
    pub small: i32,
    pub medium: i32,
    pub large: i32,
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self {
            small: 10,
            medium: 50,
            large: 250,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GrowthThresholds {
    pub high: f64,
    pub moderate: f64,
    pub low: f64,
}

impl Default for GrowthThresholds {
    fn default() -> Self {
        Self {
            high: 0.15,
            moderate: 0.05,
            low: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfitabilityThresholds {
    pub high: f64,
    pub profitable: f64,
    pub break_even: f64,
}

impl Default for ProfitabilityThresholds {
    fn default() -> Self {
        Self {
            high: 0.15,
            profitable: 0.05,
            break_even: 0.0,
        }
    }
}

/// Cut-offs for the three category dimensions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryThresholds {
    pub size: SizeThresholds,
    pub growth: GrowthThresholds,
    pub profitability: ProfitabilityThresholds,
}

impl CategoryThresholds {
    pub fn validate(&self) -> Result<()> {
        let s = &self.size;
        if !(0 <= s.small && s.small < s.medium && s.medium < s.large) {
            return Err(invalid("size thresholds must satisfy 0 <= small < medium < large"));
        }
        let g = &self.growth;
        if !all_finite(&[g.high, g.moderate, g.low]) || !(g.high > g.moderate && g.moderate > g.low)
        {
            return Err(invalid("growth thresholds must satisfy high > moderate > low"));
        }
        let p = &self.profitability;
        if !all_finite(&[p.high, p.profitable, p.break_even])
            || !(p.high > p.profitable && p.profitable > p.break_even)
        {
            return Err(invalid(
                "profitability thresholds must satisfy high > profitable > breakEven",
            ));
        }
        Ok(())
    }

    pub fn size_rules(&self) -> RuleTable<SizeCategory> {
        RuleTable::new(
            vec![
                (f64::from(self.size.large), SizeCategory::Large),
                (f64::from(self.size.medium), SizeCategory::Medium),
                (f64::from(self.size.small), SizeCategory::Small),
            ],
            SizeCategory::Micro,
        )
    }

    pub fn growth_rules(&self) -> RuleTable<GrowthCategory> {
        RuleTable::new(
            vec![
                (self.growth.high, GrowthCategory::HighGrowth),
                (self.growth.moderate, GrowthCategory::ModerateGrowth),
                (self.growth.low, GrowthCategory::LowGrowth),
            ],
            GrowthCategory::Declining,
        )
    }

    pub fn profitability_rules(&self) -> RuleTable<ProfitabilityCategory> {
        RuleTable::new(
            vec![
                (self.profitability.high, ProfitabilityCategory::HighlyProfitable),
                (self.profitability.profitable, ProfitabilityCategory::Profitable),
                (self.profitability.break_even, ProfitabilityCategory::BreakEven),
            ],
            ProfitabilityCategory::LossMaking,
        )
    }

    pub fn size_category(&self, employees: Option<i32>) -> SizeCategory {
        match employees {
            Some(n) if n >= 0 => self.size_rules().classify(f64::from(n)),
            _ => SizeCategory::Unknown,
        }
    }

    pub fn growth_category(&self, revenue_cagr: Option<f64>) -> GrowthCategory {
        match revenue_cagr.filter(|v| v.is_finite()) {
            Some(v) => self.growth_rules().classify(v),
            None => GrowthCategory::Unknown,
        }
    }

    pub fn profitability_category(&self, ebit_margin: Option<f64>) -> ProfitabilityCategory {
        match ebit_margin.filter(|v| v.is_finite()) {
            Some(v) => self.profitability_rules().classify(v),
            None => ProfitabilityCategory::Unknown,
        }
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn invalid(msg: &str) -> crate::errors::Error {
    ValidationError::InvalidInput(msg.to_string()).into()
}
