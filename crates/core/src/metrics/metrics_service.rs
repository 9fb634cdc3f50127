use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, info};

use crate::companies::{Company, CompanyRepositoryTrait};
use crate::constants::RECOMPUTE_BATCH_SIZE;
use crate::errors::Result;
use crate::financials::{CompanyFinancial, FinancialsRepositoryTrait};
use crate::utils::orgnr::normalize_orgnr;
use crate::utils::time_utils::{elapsed_ms, now_naive};

use super::calculations::{latest_figures, margin};
use super::metrics_model::{CompanyMetrics, RecomputeReport};
use super::metrics_traits::{MetricsRepositoryTrait, MetricsServiceTrait};
use super::scoring::{fit_score, FitInputs, ScoringConfig};

/// Derives the metrics row of one company from its reported periods.
pub fn calculate_company_metrics(
    company: &Company,
    financials: &[CompanyFinancial],
    config: &ScoringConfig,
    calculated_at: NaiveDateTime,
) -> CompanyMetrics {
    let latest = latest_figures(financials);
    let employees = latest.employees.or(company.employees);

    let ebit_margin = margin(latest.ebit, latest.revenue);
    let net_margin = margin(latest.profit, latest.revenue);
    let ebitda_margin = margin(latest.ebitda, latest.revenue);

    let thresholds = &config.thresholds;
    let score = fit_score(
        &FitInputs {
            revenue_cagr: latest.revenue_cagr_3y,
            ebit_margin,
            employees,
            revenue: latest.revenue,
        },
        &config.fit,
    );

    CompanyMetrics {
        orgnr: company.orgnr.clone(),
        latest_year: latest.year,
        latest_revenue: latest.revenue,
        latest_profit: latest.profit,
        latest_ebit: latest.ebit,
        latest_ebitda: latest.ebitda,
        revenue_growth_yoy: latest.revenue_growth_yoy,
        revenue_cagr_3y: latest.revenue_cagr_3y,
        ebit_margin,
        net_margin,
        ebitda_margin,
        size_category: thresholds.size_category(employees),
        growth_category: thresholds.growth_category(latest.revenue_cagr_3y),
        profitability_category: thresholds.profitability_category(ebit_margin),
        fit_score: score.total,
        calculated_at,
    }
}

pub struct MetricsService {
    company_repository: Arc<dyn CompanyRepositoryTrait>,
    financials_repository: Arc<dyn FinancialsRepositoryTrait>,
    metrics_repository: Arc<dyn MetricsRepositoryTrait>,
    config: ScoringConfig,
}

impl MetricsService {
    pub fn new(
        company_repository: Arc<dyn CompanyRepositoryTrait>,
        financials_repository: Arc<dyn FinancialsRepositoryTrait>,
        metrics_repository: Arc<dyn MetricsRepositoryTrait>,
        config: ScoringConfig,
    ) -> Self {
        MetricsService {
            company_repository,
            financials_repository,
            metrics_repository,
            config,
        }
    }
}

#[async_trait]
impl MetricsServiceTrait for MetricsService {
    fn compute_metrics(
        &self,
        company: &Company,
        financials: &[CompanyFinancial],
    ) -> CompanyMetrics {
        calculate_company_metrics(company, financials, &self.config, now_naive())
    }

    fn get_metrics(&self, orgnr: &str) -> Result<Option<CompanyMetrics>> {
        let orgnr = normalize_orgnr(orgnr)?;
        self.metrics_repository.get_metrics(&orgnr)
    }

    async fn recompute_all(&self) -> Result<RecomputeReport> {
        let started = Instant::now();
        let companies = self.company_repository.load_companies()?;
        let now = now_naive();

        let mut metrics_written = 0;
        for batch in companies.chunks(RECOMPUTE_BATCH_SIZE) {
            let orgnrs: Vec<String> = batch.iter().map(|c| c.orgnr.clone()).collect();
            let financials = self.financials_repository.load_financials_for(&orgnrs)?;

            let mut by_orgnr: HashMap<&str, Vec<CompanyFinancial>> = HashMap::new();
            for row in &financials {
                by_orgnr
                    .entry(row.orgnr.as_str())
                    .or_default()
                    .push(row.clone());
            }

            let metrics: Vec<CompanyMetrics> = batch
                .iter()
                .map(|company| {
                    let rows = by_orgnr
                        .get(company.orgnr.as_str())
                        .map(Vec::as_slice)
                        .unwrap_or(&[]);
                    calculate_company_metrics(company, rows, &self.config, now)
                })
                .collect();
            debug!(
                "Computed metrics for {} companies from {} periods",
                metrics.len(),
                financials.len()
            );
            metrics_written += self.metrics_repository.upsert_metrics(metrics).await?;
        }

        let report = RecomputeReport {
            companies: companies.len(),
            metrics_written,
            duration_ms: elapsed_ms(started),
        };
        info!(
            "Recomputed metrics for {} companies in {} ms",
            report.companies, report.duration_ms
        );
        Ok(report)
    }

    async fn recompute_company(&self, orgnr: &str) -> Result<CompanyMetrics> {
        let orgnr = normalize_orgnr(orgnr)?;
        let company = self.company_repository.get_company(&orgnr)?;
        let financials = self.financials_repository.get_financials(&orgnr)?;
        let metrics = self.compute_metrics(&company, &financials);
        self.metrics_repository
            .upsert_metrics(vec![metrics.clone()])
            .await?;
        Ok(metrics)
    }
}
