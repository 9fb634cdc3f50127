use std::path::Path;
use std::sync::Arc;

use log::info;
use serde::Serialize;

use super::export_model::{
    CompanyCsvRow, ExportReport, ExportedFile, FinancialCsvRow, MetricsCsvRow,
};
use crate::companies::{Company, CompanyRepositoryTrait};
use crate::errors::Result;
use crate::financials::{CompanyFinancial, FinancialsRepositoryTrait};
use crate::metrics::{CompanyMetrics, MetricsRepositoryTrait};

pub const COMPANIES_FILE: &str = "companies.csv";
pub const FINANCIALS_FILE: &str = "company_financials.csv";
pub const METRICS_FILE: &str = "company_metrics.csv";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub trait ExportServiceTrait: Send + Sync {
    /// Writes one CSV file per normalized table into `dir`, replacing
    /// existing files.
    fn export_csv(&self, dir: &Path) -> Result<ExportReport>;
}

pub struct ExportService {
    company_repository: Arc<dyn CompanyRepositoryTrait>,
    financials_repository: Arc<dyn FinancialsRepositoryTrait>,
    metrics_repository: Arc<dyn MetricsRepositoryTrait>,
}

impl ExportService {
    pub fn new(
        company_repository: Arc<dyn CompanyRepositoryTrait>,
        financials_repository: Arc<dyn FinancialsRepositoryTrait>,
        metrics_repository: Arc<dyn MetricsRepositoryTrait>,
    ) -> Self {
        Self {
            company_repository,
            financials_repository,
            metrics_repository,
        }
    }
}

impl ExportServiceTrait for ExportService {
    fn export_csv(&self, dir: &Path) -> Result<ExportReport> {
        std::fs::create_dir_all(dir)?;

        let companies = self.company_repository.load_companies()?;
        let financials = self.financials_repository.load_all_financials()?;
        let metrics = self.metrics_repository.load_all_metrics()?;

        let files = vec![
            write_csv(dir, COMPANIES_FILE, companies.iter().map(company_row))?,
            write_csv(dir, FINANCIALS_FILE, financials.iter().map(financial_row))?,
            write_csv(dir, METRICS_FILE, metrics.iter().map(metrics_row))?,
        ];
        info!(
            "Exported {} companies, {} financial rows and {} metrics rows to {}",
            companies.len(),
            financials.len(),
            metrics.len(),
            dir.display()
        );

        Ok(ExportReport {
            directory: dir.display().to_string(),
            files,
            database_snapshot: None,
        })
    }
}

fn write_csv<T: Serialize>(
    dir: &Path,
    name: &str,
    rows: impl Iterator<Item = T>,
) -> Result<ExportedFile> {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path)?;
    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;
    Ok(ExportedFile {
        name: name.to_string(),
        path: path.display().to_string(),
        rows: count,
    })
}

fn company_row(company: &Company) -> CompanyCsvRow<'_> {
    let address = company.address.as_ref();
    CompanyCsvRow {
        orgnr: &company.orgnr,
        company_name: &company.company_name,
        homepage: company.homepage.as_deref(),
        street: address.and_then(|a| a.street.as_deref()),
        postal_code: address.and_then(|a| a.postal_code.as_deref()),
        city: address.and_then(|a| a.city.as_deref()),
        municipality: address.and_then(|a| a.municipality.as_deref()),
        county: address.and_then(|a| a.county.as_deref()),
        segment_names: company.segment_names.join(";"),
        employees: company.employees,
        foundation_year: company.foundation_year,
        created_at: company.created_at.format(TIMESTAMP_FORMAT).to_string(),
        updated_at: company.updated_at.format(TIMESTAMP_FORMAT).to_string(),
    }
}

fn financial_row(financial: &CompanyFinancial) -> FinancialCsvRow<'_> {
    FinancialCsvRow {
        id: &financial.id,
        orgnr: &financial.orgnr,
        year: financial.year,
        period: &financial.period,
        currency: &financial.currency,
        revenue: financial.revenue,
        profit: financial.profit,
        ebit: financial.ebit,
        ebitda: financial.ebitda,
        employees: financial.employees,
        account_codes: serde_json::to_string(&financial.account_codes).unwrap_or_default(),
    }
}

fn metrics_row(metrics: &CompanyMetrics) -> MetricsCsvRow<'_> {
    MetricsCsvRow {
        orgnr: &metrics.orgnr,
        latest_year: metrics.latest_year,
        latest_revenue: metrics.latest_revenue,
        latest_profit: metrics.latest_profit,
        latest_ebit: metrics.latest_ebit,
        latest_ebitda: metrics.latest_ebitda,
        revenue_growth_yoy: metrics.revenue_growth_yoy,
        revenue_cagr_3y: metrics.revenue_cagr_3y,
        ebit_margin: metrics.ebit_margin,
        net_margin: metrics.net_margin,
        ebitda_margin: metrics.ebitda_margin,
        size_category: metrics.size_category.as_str(),
        growth_category: metrics.growth_category.as_str(),
        profitability_category: metrics.profitability_category.as_str(),
        fit_score: metrics.fit_score,
        calculated_at: metrics.calculated_at.format(TIMESTAMP_FORMAT).to_string(),
    }
}
