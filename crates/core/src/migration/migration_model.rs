use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_AMOUNT_MULTIPLIER;

pub const DEFAULT_BATCH_SIZE: usize = 500;
pub const MAX_BATCH_SIZE: usize = 5000;
/// Warnings kept on a report; later ones are only logged.
pub const MAX_REPORTED_WARNINGS: usize = 200;

/// One row of the legacy `staging_companies` table, as scraped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagingCompany {
    pub id: i64,
    pub orgnr: String,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub homepage: Option<String>,
    pub segment: Option<String>,
    pub employees: Option<String>,
    pub foundation_year: Option<String>,
    pub scraped_at: Option<String>,
}

/// One long-format row of `staging_financials`: a single account code of a
/// single period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagingFinancialRow {
    pub id: i64,
    pub orgnr: String,
    pub year: Option<i32>,
    pub period: Option<String>,
    pub account_code: String,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MigrationOptions {
    /// Map and compute everything but write nothing
    pub dry_run: bool,
    pub batch_size: Option<usize>,
    pub amount_multiplier: Option<f64>,
}

impl MigrationOptions {
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size
            .unwrap_or(DEFAULT_BATCH_SIZE)
            .clamp(1, MAX_BATCH_SIZE)
    }

    pub fn effective_multiplier(&self) -> f64 {
        self.amount_multiplier.unwrap_or(DEFAULT_AMOUNT_MULTIPLIER)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub dry_run: bool,
    pub staging_rows_read: usize,
    pub companies_migrated: usize,
    pub companies_skipped: usize,
    pub financial_rows_read: usize,
    pub financial_periods_written: usize,
    pub metrics_written: usize,
    pub warnings: Vec<String>,
    pub duration_ms: u64,
}

impl MigrationReport {
    pub fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        if self.warnings.len() < MAX_REPORTED_WARNINGS {
            self.warnings.push(message);
        }
    }
}
