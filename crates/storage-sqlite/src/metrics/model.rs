//! Database model for pre-computed company metrics.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::warn;
use sme_screener_core::metrics::CompanyMetrics;
use std::str::FromStr;

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::company_metrics)]
#[diesel(primary_key(orgnr))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MetricsDB {
    pub orgnr: String,
    pub latest_year: Option<i32>,
    pub latest_revenue: Option<f64>,
    pub latest_profit: Option<f64>,
    pub latest_ebit: Option<f64>,
    pub latest_ebitda: Option<f64>,
    pub revenue_growth_yoy: Option<f64>,
    pub revenue_cagr_3y: Option<f64>,
    pub ebit_margin: Option<f64>,
    pub net_margin: Option<f64>,
    pub ebitda_margin: Option<f64>,
    pub size_category: String,
    pub growth_category: String,
    pub profitability_category: String,
    pub fit_score: i32,
    pub calculated_at: NaiveDateTime,
}

/// Unknown labels read back from the database degrade to the fallback.
fn label_or<T: FromStr>(raw: &str, fallback: T) -> T {
    raw.parse().unwrap_or_else(|_| {
        warn!("Unknown category label '{}' in company_metrics", raw);
        fallback
    })
}

impl From<MetricsDB> for CompanyMetrics {
    fn from(db: MetricsDB) -> Self {
        use sme_screener_core::metrics::{GrowthCategory, ProfitabilityCategory, SizeCategory};
        Self {
            size_category: label_or(&db.size_category, SizeCategory::Unknown),
            growth_category: label_or(&db.growth_category, GrowthCategory::Unknown),
            profitability_category: label_or(
                &db.profitability_category,
                ProfitabilityCategory::Unknown,
            ),
            orgnr: db.orgnr,
            latest_year: db.latest_year,
            latest_revenue: db.latest_revenue,
            latest_profit: db.latest_profit,
            latest_ebit: db.latest_ebit,
            latest_ebitda: db.latest_ebitda,
            revenue_growth_yoy: db.revenue_growth_yoy,
            revenue_cagr_3y: db.revenue_cagr_3y,
            ebit_margin: db.ebit_margin,
            net_margin: db.net_margin,
            ebitda_margin: db.ebitda_margin,
            fit_score: db.fit_score,
            calculated_at: db.calculated_at,
        }
    }
}

impl From<CompanyMetrics> for MetricsDB {
    fn from(domain: CompanyMetrics) -> Self {
        Self {
            orgnr: domain.orgnr,
            latest_year: domain.latest_year,
            latest_revenue: domain.latest_revenue,
            latest_profit: domain.latest_profit,
            latest_ebit: domain.latest_ebit,
            latest_ebitda: domain.latest_ebitda,
            revenue_growth_yoy: domain.revenue_growth_yoy,
            revenue_cagr_3y: domain.revenue_cagr_3y,
            ebit_margin: domain.ebit_margin,
            net_margin: domain.net_margin,
            ebitda_margin: domain.ebitda_margin,
            size_category: domain.size_category.as_str().to_string(),
            growth_category: domain.growth_category.as_str().to_string(),
            profitability_category: domain.profitability_category.as_str().to_string(),
            fit_score: domain.fit_score,
            calculated_at: domain.calculated_at,
        }
    }
}
