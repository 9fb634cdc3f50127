use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, info};

use super::field_mapping::{
    normalize_homepage, parse_address, parse_employees, parse_foundation_year, parse_segments,
};
use super::migration_model::{MigrationOptions, MigrationReport, StagingCompany};
use super::migration_traits::{MigrationServiceTrait, StagingRepositoryTrait};
use super::pivot::pivot_financials;
use crate::companies::{Company, CompanyRepositoryTrait};
use crate::errors::{Result, ValidationError};
use crate::financials::{CompanyFinancial, FinancialsRepositoryTrait};
use crate::metrics::{calculate_company_metrics, MetricsRepositoryTrait, ScoringConfig};
use crate::utils::orgnr::{format_orgnr, has_valid_check_digit, normalize_orgnr};
use crate::utils::time_utils::{current_year, elapsed_ms, now_naive};

/// Batch job moving the legacy staging tables into the normalized schema.
pub struct MigrationService {
    staging_repository: Arc<dyn StagingRepositoryTrait>,
    company_repository: Arc<dyn CompanyRepositoryTrait>,
    financials_repository: Arc<dyn FinancialsRepositoryTrait>,
    metrics_repository: Arc<dyn MetricsRepositoryTrait>,
    scoring: ScoringConfig,
}

impl MigrationService {
    pub fn new(
        staging_repository: Arc<dyn StagingRepositoryTrait>,
        company_repository: Arc<dyn CompanyRepositoryTrait>,
        financials_repository: Arc<dyn FinancialsRepositoryTrait>,
        metrics_repository: Arc<dyn MetricsRepositoryTrait>,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            staging_repository,
            company_repository,
            financials_repository,
            metrics_repository,
            scoring,
        }
    }
}

/// Maps one staging row, or returns `None` after recording why it was skipped.
pub fn map_staging_company(
    row: &StagingCompany,
    now: NaiveDateTime,
    report: &mut MigrationReport,
) -> Option<Company> {
    let orgnr = match normalize_orgnr(&row.orgnr) {
        Ok(orgnr) => orgnr,
        Err(_) => {
            report.warn(format!(
                "staging_companies {}: skipped, invalid orgnr '{}'",
                row.id, row.orgnr
            ));
            return None;
        }
    };
    if !has_valid_check_digit(&orgnr) {
        report.warn(format!(
            "staging_companies {}: orgnr {} fails the check digit",
            row.id, orgnr
        ));
    }

    let Some(company_name) = row
        .company_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
    else {
        report.warn(format!(
            "staging_companies {}: skipped, {} has no company name",
            row.id, orgnr
        ));
        return None;
    };

    let address = match row.address.as_deref().map(parse_address) {
        Some(Ok(address)) => address,
        Some(Err(message)) => {
            report.warn(format!("staging_companies {}: {}", row.id, message));
            None
        }
        None => None,
    };

    Some(Company {
        orgnr,
        company_name: company_name.to_string(),
        homepage: row.homepage.as_deref().and_then(normalize_homepage),
        address,
        segment_names: row
            .segment
            .as_deref()
            .map(parse_segments)
            .unwrap_or_default(),
        employees: row.employees.as_deref().and_then(parse_employees),
        foundation_year: row
            .foundation_year
            .as_deref()
            .and_then(|v| parse_foundation_year(v, current_year())),
        created_at: now,
        updated_at: now,
    })
}

#[async_trait]
impl MigrationServiceTrait for MigrationService {
    async fn run(&self, options: MigrationOptions) -> Result<MigrationReport> {
        let started = Instant::now();
        let batch_size = options.effective_batch_size();
        let multiplier = options.effective_multiplier();
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(ValidationError::InvalidInput(format!(
                "amount multiplier must be positive, got {}",
                multiplier
            ))
            .into());
        }

        let total = self.staging_repository.count_staging_companies()?;
        info!(
            "Starting staging migration: {} rows, batch size {}, dry run {}",
            total, batch_size, options.dry_run
        );

        let mut report = MigrationReport {
            dry_run: options.dry_run,
            ..Default::default()
        };
        let mut migrated: HashSet<String> = HashSet::new();
        // Periods last written per orgnr; a later duplicate replaces them.
        let mut written_periods: HashMap<String, usize> = HashMap::new();
        let mut after_id = 0;

        loop {
            let page = self
                .staging_repository
                .load_companies_page(after_id, batch_size)?;
            let Some(last) = page.last() else {
                break;
            };
            after_id = last.id;
            report.staging_rows_read += page.len();
            let now = now_naive();

            // Last row wins for orgnrs repeated in staging.
            let mut companies: Vec<Company> = Vec::with_capacity(page.len());
            let mut index: HashMap<String, usize> = HashMap::new();
            for row in &page {
                let Some(company) = map_staging_company(row, now, &mut report) else {
                    report.companies_skipped += 1;
                    continue;
                };
                if !migrated.insert(company.orgnr.clone()) {
                    report.warn(format!(
                        "staging_companies {}: duplicate orgnr {}, last row wins",
                        row.id, company.orgnr
                    ));
                }
                match index.get(&company.orgnr) {
                    Some(&pos) => companies[pos] = company,
                    None => {
                        index.insert(company.orgnr.clone(), companies.len());
                        companies.push(company);
                    }
                }
            }
            if companies.is_empty() {
                continue;
            }

            // Staging financials may spell the orgnr differently from the
            // company row, so look up every common spelling.
            let mut spellings: HashSet<String> = page.iter().map(|r| r.orgnr.clone()).collect();
            for orgnr in index.keys() {
                spellings.insert(orgnr.clone());
                spellings.insert(format_orgnr(orgnr));
            }
            let raw_orgnrs: Vec<String> = spellings.into_iter().collect();
            let staging_rows = self
                .staging_repository
                .load_financial_rows_for(&raw_orgnrs)?;
            report.financial_rows_read += staging_rows.len();

            let pivot = pivot_financials(&staging_rows, multiplier, now);
            for warning in pivot.warnings {
                report.warn(warning);
            }
            let mut by_orgnr: HashMap<String, Vec<CompanyFinancial>> = HashMap::new();
            for financial in pivot.financials {
                if index.contains_key(&financial.orgnr) {
                    by_orgnr
                        .entry(financial.orgnr.clone())
                        .or_default()
                        .push(financial);
                }
            }

            let mut metrics = Vec::with_capacity(companies.len());
            for company in companies.iter_mut() {
                let rows = by_orgnr
                    .get(&company.orgnr)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                if let Some(reported) = rows
                    .iter()
                    .max_by(|a, b| a.period.cmp(&b.period))
                    .and_then(|latest| latest.employees)
                {
                    company.employees = Some(reported);
                }
                metrics.push(calculate_company_metrics(company, rows, &self.scoring, now));
            }

            let orgnrs: Vec<String> = companies.iter().map(|c| c.orgnr.clone()).collect();
            for orgnr in &orgnrs {
                let count = by_orgnr.get(orgnr).map_or(0, Vec::len);
                written_periods.insert(orgnr.clone(), count);
            }
            let financials: Vec<CompanyFinancial> = by_orgnr.into_values().flatten().collect();
            let periods = financials.len();

            if !options.dry_run {
                self.company_repository.upsert_companies(companies).await?;
                self.financials_repository
                    .replace_financials(orgnrs.clone(), financials)
                    .await?;
                self.metrics_repository.upsert_metrics(metrics).await?;
            }

            debug!(
                "Migrated page ending at staging id {}: {} companies, {} periods",
                after_id,
                orgnrs.len(),
                periods
            );
        }

        report.companies_migrated = migrated.len();
        report.financial_periods_written = written_periods.values().sum();
        report.metrics_written = written_periods.len();
        report.duration_ms = elapsed_ms(started);
        info!(
            "Staging migration finished: {} companies migrated, {} skipped, {} periods, {} warnings, {} ms",
            report.companies_migrated,
            report.companies_skipped,
            report.financial_periods_written,
            report.warnings.len(),
            report.duration_ms
        );
        Ok(report)
    }
}
