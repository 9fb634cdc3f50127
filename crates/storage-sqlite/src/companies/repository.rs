use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use sme_screener_core::companies::{
    Company, CompanyFilter, CompanyListItem, CompanyRepositoryTrait, CompanySearchResponse,
    CompanySort, CompanySortField,
};
use sme_screener_core::metrics::CompanyMetrics;
use sme_screener_core::errors::ValidationError;
use sme_screener_core::Result;

use super::model::{CompanyChangesetDB, CompanyDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::metrics::MetricsDB;
use crate::schema::{companies, company_metrics};
use crate::utils::chunk_for_sqlite;

/// Escapes LIKE wildcards so user input matches literally.
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Repository for companies and their joined metrics
pub struct CompanyRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CompanyRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CompanyRepositoryTrait for CompanyRepository {
    fn search_companies(
        &self,
        filter: &CompanyFilter,
        sort: &CompanySort,
        page: i64,
        page_size: i64,
    ) -> Result<CompanySearchResponse> {
        let offset = page.checked_mul(page_size).ok_or_else(|| {
            ValidationError::InvalidInput(format!(
                "page {} with page size {} is out of range",
                page, page_size
            ))
        })?;
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = companies::table
                .left_join(company_metrics::table)
                .into_boxed();

            if let Some(ref text) = filter.query {
                let name_pattern = like_pattern(text);
                let orgnr_pattern = like_pattern(&text.replace('-', ""));
                query = query.filter(
                    companies::company_name
                        .like(name_pattern)
                        .escape('\\')
                        .or(companies::orgnr.like(orgnr_pattern).escape('\\')),
                );
            }
            if let Some(ref segment) = filter.segment {
                // segment_names is a JSON array; match one quoted element
                let pattern = like_pattern(&format!("\"{}\"", segment));
                query = query.filter(companies::segment_names.like(pattern).escape('\\'));
            }
            if let Some(size) = filter.size_category {
                query = query.filter(
                    company_metrics::size_category
                        .nullable()
                        .eq(size.as_str()),
                );
            }
            if let Some(growth) = filter.growth_category {
                query = query.filter(
                    company_metrics::growth_category
                        .nullable()
                        .eq(growth.as_str()),
                );
            }
            if let Some(profitability) = filter.profitability_category {
                query = query.filter(
                    company_metrics::profitability_category
                        .nullable()
                        .eq(profitability.as_str()),
                );
            }
            if let Some(min) = filter.min_revenue {
                query = query.filter(company_metrics::latest_revenue.nullable().ge(min));
            }
            if let Some(max) = filter.max_revenue {
                query = query.filter(company_metrics::latest_revenue.nullable().le(max));
            }
            if let Some(min) = filter.min_employees {
                query = query.filter(companies::employees.ge(min));
            }
            if let Some(max) = filter.max_employees {
                query = query.filter(companies::employees.le(max));
            }
            if let Some(min) = filter.min_fit_score {
                query = query.filter(company_metrics::fit_score.nullable().ge(min));
            }

            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;

        // Missing values sort last in either direction.
        macro_rules! nulls_last {
            ($query:expr, $column:expr) => {
                if sort.desc {
                    $query.order(($column.is_null().asc(), $column.desc()))
                } else {
                    $query.order(($column.is_null().asc(), $column.asc()))
                }
            };
        }

        let query = create_base_query();
        let query = match sort.field {
            CompanySortField::FitScore => {
                nulls_last!(query, company_metrics::fit_score.nullable())
            }
            CompanySortField::Revenue => {
                nulls_last!(query, company_metrics::latest_revenue.nullable())
            }
            CompanySortField::RevenueCagr => {
                nulls_last!(query, company_metrics::revenue_cagr_3y.nullable())
            }
            CompanySortField::EbitMargin => {
                nulls_last!(query, company_metrics::ebit_margin.nullable())
            }
            CompanySortField::Employees => nulls_last!(query, companies::employees),
            CompanySortField::Name => {
                if sort.desc {
                    query.order(companies::company_name.desc())
                } else {
                    query.order(companies::company_name.asc())
                }
            }
        };

        let rows = query
            .then_order_by(companies::company_name.asc())
            .then_order_by(companies::orgnr.asc())
            .select((CompanyDB::as_select(), Option::<MetricsDB>::as_select()))
            .limit(page_size)
            .offset(offset)
            .load::<(CompanyDB, Option<MetricsDB>)>(&mut conn)
            .map_err(StorageError::from)?;

        let data = rows
            .into_iter()
            .map(|(company, metrics)| CompanyListItem {
                company: Company::from(company),
                metrics: metrics.map(CompanyMetrics::from),
            })
            .collect();

        Ok(CompanySearchResponse {
            data,
            total,
            page,
            page_size,
        })
    }

    fn get_company(&self, orgnr: &str) -> Result<Company> {
        let mut conn = get_connection(&self.pool)?;
        let company = companies::table
            .find(orgnr)
            .select(CompanyDB::as_select())
            .first::<CompanyDB>(&mut conn)
            .map_err(not_found_as("Company", orgnr))?;
        Ok(company.into())
    }

    fn load_companies(&self) -> Result<Vec<Company>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = companies::table
            .order(companies::orgnr.asc())
            .select(CompanyDB::as_select())
            .load::<CompanyDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Company::from).collect())
    }

    fn load_companies_by_orgnrs(&self, orgnrs: &[String]) -> Result<Vec<Company>> {
        let mut conn = get_connection(&self.pool)?;
        let mut result = Vec::with_capacity(orgnrs.len());
        for chunk in chunk_for_sqlite(orgnrs) {
            let rows = companies::table
                .filter(companies::orgnr.eq_any(chunk))
                .select(CompanyDB::as_select())
                .load::<CompanyDB>(&mut conn)
                .map_err(StorageError::from)?;
            result.extend(rows.into_iter().map(Company::from));
        }
        result.sort_by(|a, b| a.orgnr.cmp(&b.orgnr));
        Ok(result)
    }

    fn count_companies(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let count = companies::table
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count)
    }

    async fn upsert_companies(&self, companies_to_save: Vec<Company>) -> Result<usize> {
        if companies_to_save.is_empty() {
            return Ok(0);
        }
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected_rows = 0;
                for company in companies_to_save {
                    let row: CompanyDB = company.into();
                    let changes = CompanyChangesetDB::from(&row);
                    affected_rows += diesel::insert_into(companies::table)
                        .values(&row)
                        .on_conflict(companies::orgnr)
                        .do_update()
                        .set(&changes)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(affected_rows)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsRepository;
    use crate::test_support::{company, setup_db, ts};
    use sme_screener_core::companies::Address;
    use sme_screener_core::metrics::{
        GrowthCategory, MetricsRepositoryTrait, ProfitabilityCategory, SizeCategory,
    };

    fn metrics(orgnr: &str, revenue: f64, cagr: Option<f64>, fit_score: i32) -> CompanyMetrics {
        CompanyMetrics {
            orgnr: orgnr.to_string(),
            latest_year: Some(2023),
            latest_revenue: Some(revenue),
            latest_profit: None,
            latest_ebit: None,
            latest_ebitda: None,
            revenue_growth_yoy: None,
            revenue_cagr_3y: cagr,
            ebit_margin: Some(0.1),
            net_margin: None,
            ebitda_margin: None,
            size_category: SizeCategory::Small,
            growth_category: if cagr.unwrap_or(0.0) >= 0.15 {
                GrowthCategory::HighGrowth
            } else {
                GrowthCategory::LowGrowth
            },
            profitability_category: ProfitabilityCategory::Profitable,
            fit_score,
            calculated_at: ts("2024-02-01 00:00:00"),
        }
    }

    async fn seeded() -> (CompanyRepository, tempfile::TempDir) {
        let (pool, writer, dir) = setup_db().await;
        let repo = CompanyRepository::new(pool.clone(), writer.clone());
        let metrics_repo = MetricsRepository::new(pool, writer);

        let mut alfa = company("5560000001", "Alfa Verkstad AB");
        alfa.segment_names = vec!["Industri".to_string(), "Bygg".to_string()];
        alfa.employees = Some(25);
        let mut beta = company("5560000002", "Beta 100% Konsult AB");
        beta.segment_names = vec!["Konsult".to_string()];
        beta.employees = Some(8);
        let mut gamma = company("5560000003", "Gamma Handel AB");
        gamma.employees = Some(120);

        repo.upsert_companies(vec![alfa, beta, gamma]).await.unwrap();
        metrics_repo
            .upsert_metrics(vec![
                metrics("5560000001", 40_000_000.0, Some(0.25), 82),
                metrics("5560000002", 9_000_000.0, Some(0.02), 41),
            ])
            .await
            .unwrap();
        (repo, dir)
    }

    #[tokio::test]
    async fn test_search_defaults_to_fit_score_with_missing_metrics_last() {
        let (repo, _dir) = seeded().await;
        let page = repo
            .search_companies(&CompanyFilter::default(), &CompanySort::default(), 0, 10)
            .unwrap();
        assert_eq!(page.total, 3);
        let orgnrs: Vec<_> = page.data.iter().map(|i| i.company.orgnr.as_str()).collect();
        assert_eq!(orgnrs, vec!["5560000001", "5560000002", "5560000003"]);
        assert!(page.data[2].metrics.is_none());

        let ascending = CompanySort {
            field: CompanySortField::FitScore,
            desc: false,
        };
        let page = repo
            .search_companies(&CompanyFilter::default(), &ascending, 0, 10)
            .unwrap();
        assert_eq!(page.data[0].company.orgnr, "5560000002");
        assert_eq!(page.data[2].company.orgnr, "5560000003");
    }

    #[tokio::test]
    async fn test_search_filters() {
        let (repo, _dir) = seeded().await;
        let sort = CompanySort::default();

        let by_query = CompanyFilter {
            query: Some("verkstad".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.search_companies(&by_query, &sort, 0, 10).unwrap().total, 1);

        // wildcard characters match literally
        let literal = CompanyFilter {
            query: Some("100%".to_string()),
            ..Default::default()
        };
        let page = repo.search_companies(&literal, &sort, 0, 10).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].company.orgnr, "5560000002");

        let by_orgnr = CompanyFilter {
            query: Some("556000-0003".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.search_companies(&by_orgnr, &sort, 0, 10).unwrap().total, 1);

        let by_segment = CompanyFilter {
            segment: Some("Bygg".to_string()),
            ..Default::default()
        };
        let page = repo.search_companies(&by_segment, &sort, 0, 10).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].company.segment_names, vec!["Industri", "Bygg"]);

        let by_growth = CompanyFilter {
            growth_category: Some(GrowthCategory::HighGrowth),
            min_revenue: Some(10_000_000.0),
            ..Default::default()
        };
        let page = repo.search_companies(&by_growth, &sort, 0, 10).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].company.orgnr, "5560000001");

        let by_employees = CompanyFilter {
            min_employees: Some(10),
            max_employees: Some(200),
            ..Default::default()
        };
        assert_eq!(repo.search_companies(&by_employees, &sort, 0, 10).unwrap().total, 2);

        let by_score = CompanyFilter {
            min_fit_score: Some(50),
            ..Default::default()
        };
        assert_eq!(repo.search_companies(&by_score, &sort, 0, 10).unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_search_paging_and_name_sort() {
        let (repo, _dir) = seeded().await;
        let sort = CompanySort {
            field: CompanySortField::Name,
            desc: false,
        };
        let page = repo
            .search_companies(&CompanyFilter::default(), &sort, 1, 2)
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].company.company_name, "Gamma Handel AB");
    }

    #[tokio::test]
    async fn test_search_page_offset_overflow_is_rejected() {
        let (repo, _dir) = seeded().await;
        let err = repo
            .search_companies(
                &CompanyFilter::default(),
                &CompanySort::default(),
                i64::MAX / 100,
                500,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            sme_screener_core::Error::Validation(ValidationError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_upsert_keeps_created_at_and_round_trips_address() {
        let (repo, _dir) = seeded().await;
        let mut updated = company("5560000001", "Alfa Verkstad i Norr AB");
        updated.created_at = ts("2030-01-01 00:00:00");
        updated.updated_at = ts("2024-03-01 00:00:00");
        updated.address = Some(Address {
            street: Some("Storgatan 1".to_string()),
            postal_code: Some("903 25".to_string()),
            city: Some("Umeå".to_string()),
            ..Default::default()
        });
        repo.upsert_companies(vec![updated]).await.unwrap();

        let stored = repo.get_company("5560000001").unwrap();
        assert_eq!(stored.company_name, "Alfa Verkstad i Norr AB");
        assert_eq!(stored.created_at, ts("2024-01-01 00:00:00"));
        assert_eq!(stored.updated_at, ts("2024-03-01 00:00:00"));
        assert_eq!(
            stored.address.and_then(|a| a.city),
            Some("Umeå".to_string())
        );
        // unset columns are overwritten, not merged
        assert!(stored.segment_names.is_empty());
        assert_eq!(repo.count_companies().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_lookups() {
        let (repo, _dir) = seeded().await;
        let err = repo.get_company("5569999999").unwrap_err();
        assert!(err.is_not_found());

        let found = repo
            .load_companies_by_orgnrs(&["5560000003".to_string(), "5569999999".to_string()])
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(repo.load_companies().unwrap().len(), 3);
    }
}
