//! Metrics module - derived ratios, category rules, fit score, and the
//! service that recomputes them.

pub mod calculations;
pub mod categorization;
mod metrics_model;
mod metrics_service;
mod metrics_traits;
pub mod scoring;

pub use categorization::{
    CategoryThresholds, GrowthThresholds, ProfitabilityThresholds, RuleTable, SizeThresholds,
};
pub use metrics_model::{
    CompanyMetrics, GrowthCategory, ProfitabilityCategory, RecomputeReport, SizeCategory,
};
pub use metrics_service::{calculate_company_metrics, MetricsService};
pub use metrics_traits::{MetricsRepositoryTrait, MetricsServiceTrait};
pub use scoring::{fit_score, FitInputs, FitScore, FitScoreConfig, ScoringConfig};
