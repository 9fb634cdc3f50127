use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use super::analytics_model::{CategoryCount, DashboardSummary, SegmentCount};
use super::analytics_traits::AnalyticsServiceTrait;
use crate::companies::{Company, CompanyRepositoryTrait};
use crate::constants::TOP_SEGMENTS;
use crate::errors::Result;
use crate::metrics::{
    CompanyMetrics, GrowthCategory, MetricsRepositoryTrait, ProfitabilityCategory, SizeCategory,
};

pub struct AnalyticsService {
    company_repository: Arc<dyn CompanyRepositoryTrait>,
    metrics_repository: Arc<dyn MetricsRepositoryTrait>,
}

impl AnalyticsService {
    pub fn new(
        company_repository: Arc<dyn CompanyRepositoryTrait>,
        metrics_repository: Arc<dyn MetricsRepositoryTrait>,
    ) -> Self {
        Self {
            company_repository,
            metrics_repository,
        }
    }
}

impl AnalyticsServiceTrait for AnalyticsService {
    fn get_dashboard_summary(&self) -> Result<DashboardSummary> {
        let companies = self.company_repository.load_companies()?;
        let metrics = self.metrics_repository.load_all_metrics()?;
        debug!(
            "Summarizing {} companies and {} metrics rows",
            companies.len(),
            metrics.len()
        );
        Ok(summarize(&companies, &metrics))
    }
}

/// Builds the dashboard summary from loaded rows.
pub fn summarize(companies: &[Company], metrics: &[CompanyMetrics]) -> DashboardSummary {
    let mut revenues: Vec<f64> = metrics
        .iter()
        .filter_map(|m| m.latest_revenue)
        .filter(|v| v.is_finite())
        .collect();
    revenues.sort_by(|a, b| a.total_cmp(b));

    DashboardSummary {
        total_companies: companies.len() as i64,
        companies_with_metrics: metrics.len() as i64,
        average_revenue: mean(revenues.iter().copied()),
        median_revenue: median(&revenues),
        average_revenue_cagr: mean(metrics.iter().filter_map(|m| m.revenue_cagr_3y)),
        average_ebit_margin: mean(metrics.iter().filter_map(|m| m.ebit_margin)),
        average_fit_score: mean(metrics.iter().map(|m| f64::from(m.fit_score))),
        size_distribution: distribution(
            SizeCategory::ALL,
            metrics.iter().map(|m| m.size_category),
        ),
        growth_distribution: distribution(
            GrowthCategory::ALL,
            metrics.iter().map(|m| m.growth_category),
        ),
        profitability_distribution: distribution(
            ProfitabilityCategory::ALL,
            metrics.iter().map(|m| m.profitability_category),
        ),
        top_segments: top_segments(companies, TOP_SEGMENTS),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// `sorted` must be ascending.
fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

/// Counts per label, in declaration order, zero-filled.
fn distribution<C>(all: &[C], values: impl Iterator<Item = C>) -> Vec<CategoryCount>
where
    C: Copy + Eq + std::hash::Hash + std::fmt::Display,
{
    let mut counts: HashMap<C, i64> = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    all.iter()
        .map(|c| CategoryCount {
            category: c.to_string(),
            count: counts.get(c).copied().unwrap_or(0),
        })
        .collect()
}

fn top_segments(companies: &[Company], limit: usize) -> Vec<SegmentCount> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for company in companies {
        for segment in &company.segment_names {
            *counts.entry(segment.as_str()).or_insert(0) += 1;
        }
    }
    let mut segments: Vec<SegmentCount> = counts
        .into_iter()
        .map(|(segment, count)| SegmentCount {
            segment: segment.to_string(),
            count,
        })
        .collect();
    // Ties break alphabetically so the order is stable.
    segments.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.segment.cmp(&b.segment)));
    segments.truncate(limit);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::now_naive;

    fn company(orgnr: &str, segments: &[&str]) -> Company {
        Company {
            orgnr: orgnr.to_string(),
            company_name: orgnr.to_string(),
            homepage: None,
            address: None,
            segment_names: segments.iter().map(|s| s.to_string()).collect(),
            employees: None,
            foundation_year: None,
            created_at: now_naive(),
            updated_at: now_naive(),
        }
    }

    fn metrics(orgnr: &str, revenue: Option<f64>, cagr: Option<f64>, score: i32) -> CompanyMetrics {
        CompanyMetrics {
            orgnr: orgnr.to_string(),
            latest_year: Some(2023),
            latest_revenue: revenue,
            latest_profit: None,
            latest_ebit: None,
            latest_ebitda: None,
            revenue_growth_yoy: None,
            revenue_cagr_3y: cagr,
            ebit_margin: None,
            net_margin: None,
            ebitda_margin: None,
            size_category: SizeCategory::Small,
            growth_category: if cagr.is_some() {
                GrowthCategory::HighGrowth
            } else {
                GrowthCategory::Unknown
            },
            profitability_category: ProfitabilityCategory::Unknown,
            fit_score: score,
            calculated_at: now_naive(),
        }
    }

    #[test]
    fn test_empty_database_gives_zeroed_summary() {
        let summary = summarize(&[], &[]);
        assert_eq!(summary.total_companies, 0);
        assert_eq!(summary.average_revenue, None);
        assert_eq!(summary.median_revenue, None);
        assert_eq!(summary.size_distribution.len(), SizeCategory::ALL.len());
        assert!(summary.size_distribution.iter().all(|c| c.count == 0));
        assert!(summary.top_segments.is_empty());
    }

    #[test]
    fn test_summary_aggregates() {
        let companies = vec![
            company("1", &["Bygg", "Industri"]),
            company("2", &["Bygg"]),
            company("3", &["IT"]),
        ];
        let rows = vec![
            metrics("1", Some(10.0), Some(0.2), 80),
            metrics("2", Some(30.0), None, 40),
            metrics("3", Some(20.0), Some(0.4), 60),
        ];
        let summary = summarize(&companies, &rows);

        assert_eq!(summary.total_companies, 3);
        assert_eq!(summary.companies_with_metrics, 3);
        assert_eq!(summary.average_revenue, Some(20.0));
        assert_eq!(summary.median_revenue, Some(20.0));
        assert!((summary.average_revenue_cagr.unwrap() - 0.3).abs() < 1e-9);
        assert_eq!(summary.average_fit_score, Some(60.0));

        let high = summary
            .growth_distribution
            .iter()
            .find(|c| c.category == "High Growth")
            .unwrap();
        assert_eq!(high.count, 2);

        assert_eq!(summary.top_segments[0].segment, "Bygg");
        assert_eq!(summary.top_segments[0].count, 2);
        assert_eq!(summary.top_segments.len(), 3);
    }

    #[test]
    fn test_median_of_even_count() {
        assert_eq!(median(&[1.0, 2.0, 4.0, 10.0]), Some(3.0));
    }
}
