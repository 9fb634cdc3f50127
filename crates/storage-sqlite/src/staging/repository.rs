use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use sme_screener_core::migration::{StagingCompany, StagingFinancialRow, StagingRepositoryTrait};
use sme_screener_core::Result;

use super::model::{NewStagingCompanyDB, NewStagingFinancialDB, StagingCompanyDB, StagingFinancialDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{staging_companies, staging_financials};
use crate::utils::chunk_for_sqlite;

/// Reads the legacy staging tables. The loaders are only used to seed them
/// (fixtures and imports from the scraping pipeline).
pub struct StagingRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl StagingRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Appends rows to `staging_companies`; ids are assigned by SQLite.
    pub async fn insert_staging_companies(&self, rows: Vec<StagingCompany>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let rows: Vec<NewStagingCompanyDB> = rows.into_iter().map(Into::into).collect();
                let mut inserted = 0;
                for chunk in rows.chunks(100) {
                    inserted += diesel::insert_into(staging_companies::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(inserted)
            })
            .await
    }

    pub async fn insert_staging_financials(&self, rows: Vec<StagingFinancialRow>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let rows: Vec<NewStagingFinancialDB> = rows.into_iter().map(Into::into).collect();
                let mut inserted = 0;
                for chunk in rows.chunks(150) {
                    inserted += diesel::insert_into(staging_financials::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(inserted)
            })
            .await
    }
}

impl StagingRepositoryTrait for StagingRepository {
    fn count_staging_companies(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(staging_companies::table
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn load_companies_page(&self, after_id: i64, limit: usize) -> Result<Vec<StagingCompany>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = staging_companies::table
            .filter(staging_companies::id.gt(after_id))
            .order(staging_companies::id.asc())
            .limit(limit as i64)
            .select(StagingCompanyDB::as_select())
            .load::<StagingCompanyDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(StagingCompany::from).collect())
    }

    fn load_financial_rows_for(&self, orgnrs: &[String]) -> Result<Vec<StagingFinancialRow>> {
        let mut conn = get_connection(&self.pool)?;
        let mut result = Vec::new();
        for chunk in chunk_for_sqlite(orgnrs) {
            let rows = staging_financials::table
                .filter(staging_financials::orgnr.eq_any(chunk))
                .select(StagingFinancialDB::as_select())
                .load::<StagingFinancialDB>(&mut conn)
                .map_err(StorageError::from)?;
            result.extend(rows.into_iter().map(StagingFinancialRow::from));
        }
        result.sort_by_key(|row| row.id);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::CompanyRepository;
    use crate::financials::FinancialsRepository;
    use crate::metrics::MetricsRepository;
    use crate::test_support::setup_db;
    use sme_screener_core::companies::CompanyRepositoryTrait;
    use sme_screener_core::financials::FinancialsRepositoryTrait;
    use sme_screener_core::metrics::{GrowthCategory, MetricsRepositoryTrait, ScoringConfig};
    use sme_screener_core::migration::{MigrationOptions, MigrationService, MigrationServiceTrait};

    fn staging_company(orgnr: &str, name: Option<&str>) -> StagingCompany {
        StagingCompany {
            orgnr: orgnr.to_string(),
            company_name: name.map(str::to_string),
            ..Default::default()
        }
    }

    fn financial_row(orgnr: &str, year: i32, code: &str, amount: f64) -> StagingFinancialRow {
        StagingFinancialRow {
            orgnr: orgnr.to_string(),
            year: Some(year),
            account_code: code.to_string(),
            amount: Some(amount),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_paging_reads_by_id() {
        let (pool, writer, _dir) = setup_db().await;
        let repo = StagingRepository::new(pool, writer);
        let rows = (0..5)
            .map(|i| staging_company(&format!("556000000{}", i), Some("Bolag AB")))
            .collect();
        assert_eq!(repo.insert_staging_companies(rows).await.unwrap(), 5);
        assert_eq!(repo.count_staging_companies().unwrap(), 5);

        let first = repo.load_companies_page(0, 2).unwrap();
        assert_eq!(first.len(), 2);
        let rest = repo.load_companies_page(first[1].id, 10).unwrap();
        assert_eq!(rest.len(), 3);
        assert!(rest.iter().all(|r| r.id > first[1].id));
    }

    #[tokio::test]
    async fn test_migration_end_to_end() {
        let (pool, writer, _dir) = setup_db().await;
        let staging = Arc::new(StagingRepository::new(pool.clone(), writer.clone()));
        let companies = Arc::new(CompanyRepository::new(pool.clone(), writer.clone()));
        let financials = Arc::new(FinancialsRepository::new(pool.clone(), writer.clone()));
        let metrics = Arc::new(MetricsRepository::new(pool, writer));

        let mut verkstad = staging_company("556012-5790", Some("Verkstad Norr AB"));
        verkstad.address = Some(r#"{"visitorAddress":{"street":"Storgatan 1","zipCode":"90325","city":"Umeå"}}"#.to_string());
        verkstad.segment = Some(r#"["Industri", "Bygg"]"#.to_string());
        verkstad.employees = Some("10-19".to_string());
        verkstad.foundation_year = Some("Grundat 1987".to_string());
        staging
            .insert_staging_companies(vec![
                verkstad,
                staging_company("12345", Some("Trasig AB")),
            ])
            .await
            .unwrap();

        let mut rows = Vec::new();
        for (year, revenue) in [(2020, 10_000.0), (2021, 12_000.0), (2022, 15_000.0), (2023, 17_280.0)] {
            rows.push(financial_row("556012-5790", year, "SDI", revenue));
            rows.push(financial_row("556012-5790", year, "RG", revenue * 0.1));
        }
        rows.push(financial_row("556012-5790", 2023, "ANT", 22.0));
        staging.insert_staging_financials(rows).await.unwrap();

        let service = MigrationService::new(
            staging,
            companies.clone(),
            financials.clone(),
            metrics.clone(),
            ScoringConfig::default(),
        );
        let report = service.run(MigrationOptions::default()).await.unwrap();
        assert_eq!(report.staging_rows_read, 2);
        assert_eq!(report.companies_migrated, 1);
        assert_eq!(report.companies_skipped, 1);
        assert_eq!(report.financial_periods_written, 4);

        let company = companies.get_company("5560125790").unwrap();
        assert_eq!(company.segment_names, vec!["Industri", "Bygg"]);
        assert_eq!(company.employees, Some(22));
        assert_eq!(company.foundation_year, Some(1987));
        assert_eq!(
            company.address.and_then(|a| a.postal_code),
            Some("903 25".to_string())
        );

        let periods = financials.get_financials("5560125790").unwrap();
        assert_eq!(periods.len(), 4);
        assert_eq!(periods[0].period, "2023-12");
        assert_eq!(periods[0].revenue, Some(17_280_000.0));

        let stored = metrics.get_metrics("5560125790").unwrap().unwrap();
        assert_eq!(stored.latest_year, Some(2023));
        assert!((stored.revenue_cagr_3y.unwrap() - 0.2).abs() < 1e-9);
        assert_eq!(stored.growth_category, GrowthCategory::HighGrowth);

        // re-running overwrites instead of duplicating
        service.run(MigrationOptions::default()).await.unwrap();
        assert_eq!(companies.count_companies().unwrap(), 1);
        assert_eq!(financials.load_all_financials().unwrap().len(), 4);
    }
}
