use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use sme_screener_core::financials::{CompanyFinancial, FinancialsRepositoryTrait};
use sme_screener_core::Result;

use super::model::FinancialDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::company_financials;
use crate::utils::chunk_for_sqlite;

pub struct FinancialsRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl FinancialsRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FinancialsRepositoryTrait for FinancialsRepository {
    fn get_financials(&self, orgnr: &str) -> Result<Vec<CompanyFinancial>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = company_financials::table
            .filter(company_financials::orgnr.eq(orgnr))
            .order((
                company_financials::year.desc(),
                company_financials::period.desc(),
            ))
            .select(FinancialDB::as_select())
            .load::<FinancialDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(CompanyFinancial::from).collect())
    }

    fn load_financials_for(&self, orgnrs: &[String]) -> Result<Vec<CompanyFinancial>> {
        let mut conn = get_connection(&self.pool)?;
        let mut result = Vec::new();
        for chunk in chunk_for_sqlite(orgnrs) {
            let rows = company_financials::table
                .filter(company_financials::orgnr.eq_any(chunk))
                .select(FinancialDB::as_select())
                .load::<FinancialDB>(&mut conn)
                .map_err(StorageError::from)?;
            result.extend(rows.into_iter().map(CompanyFinancial::from));
        }
        result.sort_by(|a, b| {
            a.orgnr
                .cmp(&b.orgnr)
                .then_with(|| b.year.cmp(&a.year))
                .then_with(|| b.period.cmp(&a.period))
        });
        Ok(result)
    }

    fn load_all_financials(&self) -> Result<Vec<CompanyFinancial>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = company_financials::table
            .order((
                company_financials::orgnr.asc(),
                company_financials::year.desc(),
                company_financials::period.desc(),
            ))
            .select(FinancialDB::as_select())
            .load::<FinancialDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(CompanyFinancial::from).collect())
    }

    async fn replace_financials(
        &self,
        orgnrs: Vec<String>,
        rows: Vec<CompanyFinancial>,
    ) -> Result<usize> {
        if orgnrs.is_empty() && rows.is_empty() {
            return Ok(0);
        }
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut deleted = 0;
                for chunk in chunk_for_sqlite(&orgnrs) {
                    deleted += diesel::delete(
                        company_financials::table.filter(company_financials::orgnr.eq_any(chunk)),
                    )
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }

                let to_insert: Vec<FinancialDB> = rows.into_iter().map(FinancialDB::from).collect();
                let mut inserted = 0;
                // 12 columns per row keeps each statement under the bind limit
                for chunk in to_insert.chunks(50) {
                    inserted += diesel::insert_into(company_financials::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                debug!(
                    "Replaced financials: {} rows deleted, {} rows inserted",
                    deleted, inserted
                );
                Ok(inserted)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::CompanyRepository;
    use crate::test_support::{company, financial, setup_db};
    use sme_screener_core::companies::CompanyRepositoryTrait;

    #[tokio::test]
    async fn test_replace_financials_drops_stale_periods() {
        let (pool, writer, _dir) = setup_db().await;
        CompanyRepository::new(pool.clone(), writer.clone())
            .upsert_companies(vec![company("5560000001", "Alfa AB"), company("5560000002", "Beta AB")])
            .await
            .unwrap();
        let repo = FinancialsRepository::new(pool, writer);

        let mut first = financial("5560000001", 2022, Some(1e7), Some(1e6));
        first.account_codes.insert("SDI".to_string(), 10_000.0);
        repo.replace_financials(
            vec!["5560000001".to_string(), "5560000002".to_string()],
            vec![
                first,
                financial("5560000001", 2021, Some(9e6), None),
                financial("5560000002", 2022, Some(5e6), None),
            ],
        )
        .await
        .unwrap();

        let rows = repo.get_financials("5560000001").unwrap();
        assert_eq!(rows.iter().map(|r| r.year).collect::<Vec<_>>(), vec![2022, 2021]);
        assert_eq!(rows[0].account_codes.get("SDI"), Some(&10_000.0));

        let inserted = repo
            .replace_financials(
                vec!["5560000001".to_string()],
                vec![financial("5560000001", 2023, Some(1.1e7), None)],
            )
            .await
            .unwrap();
        assert_eq!(inserted, 1);
        let rows = repo.get_financials("5560000001").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].period, "2023-12");

        // other companies are untouched
        assert_eq!(repo.load_financials_for(&["5560000002".to_string()]).unwrap().len(), 1);
        assert_eq!(repo.load_all_financials().unwrap().len(), 2);
    }
}
