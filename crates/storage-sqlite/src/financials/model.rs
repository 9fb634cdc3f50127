use chrono::NaiveDateTime;
use diesel::prelude::*;
use sme_screener_core::financials::{AccountCodes, CompanyFinancial};

use crate::utils::decode_json_column;

/// Database model for one reporting period
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::company_financials)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FinancialDB {
    pub id: String,
    pub orgnr: String,
    pub year: i32,
    pub period: String,
    pub currency: String,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    pub ebit: Option<f64>,
    pub ebitda: Option<f64>,
    pub employees: Option<i32>,
    /// JSON object of raw account codes
    pub account_codes: String,
    pub created_at: NaiveDateTime,
}

impl From<FinancialDB> for CompanyFinancial {
    fn from(db: FinancialDB) -> Self {
        Self {
            account_codes: decode_json_column::<AccountCodes>(
                "company_financials.account_codes",
                &db.account_codes,
            ),
            id: db.id,
            orgnr: db.orgnr,
            year: db.year,
            period: db.period,
            currency: db.currency,
            revenue: db.revenue,
            profit: db.profit,
            ebit: db.ebit,
            ebitda: db.ebitda,
            employees: db.employees,
            created_at: db.created_at,
        }
    }
}

impl From<CompanyFinancial> for FinancialDB {
    fn from(domain: CompanyFinancial) -> Self {
        Self {
            account_codes: serde_json::to_string(&domain.account_codes)
                .unwrap_or_else(|_| "{}".to_string()),
            id: domain.id,
            orgnr: domain.orgnr,
            year: domain.year,
            period: domain.period,
            currency: domain.currency,
            revenue: domain.revenue,
            profit: domain.profit,
            ebit: domain.ebit,
            ebitda: domain.ebitda,
            employees: domain.employees,
            created_at: domain.created_at,
        }
    }
}
