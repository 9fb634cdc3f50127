//! Dashboard aggregates over companies and their metrics.

mod analytics_model;
mod analytics_service;
mod analytics_traits;

pub use analytics_model::{CategoryCount, DashboardSummary, SegmentCount};
pub use analytics_service::{summarize, AnalyticsService};
pub use analytics_traits::AnalyticsServiceTrait;
