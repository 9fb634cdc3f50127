use serde::{Deserialize, Serialize};

/// Number of companies carrying a category label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SegmentCount {
    pub segment: String,
    pub count: i64,
}

/// Aggregates shown on the dashboard landing page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_companies: i64,
    pub companies_with_metrics: i64,
    pub average_revenue: Option<f64>,
    pub median_revenue: Option<f64>,
    pub average_revenue_cagr: Option<f64>,
    pub average_ebit_margin: Option<f64>,
    pub average_fit_score: Option<f64>,
    pub size_distribution: Vec<CategoryCount>,
    pub growth_distribution: Vec<CategoryCount>,
    pub profitability_distribution: Vec<CategoryCount>,
    pub top_segments: Vec<SegmentCount>,
}
