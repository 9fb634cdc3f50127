//! Database models for the legacy staging tables.

use diesel::prelude::*;
use sme_screener_core::migration::{StagingCompany, StagingFinancialRow};

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::staging_companies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StagingCompanyDB {
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

/// Staging row without its autoincrement id.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::staging_companies)]
pub struct NewStagingCompanyDB {
    pub orgnr: String,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub homepage: Option<String>,
    pub segment: Option<String>,
    pub employees: Option<String>,
    pub foundation_year: Option<String>,
    pub scraped_at: Option<String>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::staging_financials)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StagingFinancialDB {
    pub id: i64,
    pub orgnr: String,
    pub year: Option<i32>,
    pub period: Option<String>,
    pub account_code: String,
    pub amount: Option<f64>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::staging_financials)]
pub struct NewStagingFinancialDB {
    pub orgnr: String,
    pub year: Option<i32>,
    pub period: Option<String>,
    pub account_code: String,
    pub amount: Option<f64>,
}

impl From<StagingCompanyDB> for StagingCompany {
    fn from(db: StagingCompanyDB) -> Self {
        Self {
            id: db.id,
            orgnr: db.orgnr,
            company_name: db.company_name,
            address: db.address,
            homepage: db.homepage,
            segment: db.segment,
            employees: db.employees,
            foundation_year: db.foundation_year,
            scraped_at: db.scraped_at,
        }
    }
}

impl From<StagingCompany> for NewStagingCompanyDB {
    fn from(row: StagingCompany) -> Self {
        Self {
            orgnr: row.orgnr,
            company_name: row.company_name,
            address: row.address,
            homepage: row.homepage,
            segment: row.segment,
            employees: row.employees,
            foundation_year: row.foundation_year,
            scraped_at: row.scraped_at,
        }
    }
}

impl From<StagingFinancialDB> for StagingFinancialRow {
    fn from(db: StagingFinancialDB) -> Self {
        Self {
            id: db.id,
            orgnr: db.orgnr,
            year: db.year,
            period: db.period,
            account_code: db.account_code,
            amount: db.amount,
        }
    }
}

impl From<StagingFinancialRow> for NewStagingFinancialDB {
    fn from(row: StagingFinancialRow) -> Self {
        Self {
            orgnr: row.orgnr,
            year: row.year,
            period: row.period,
            account_code: row.account_code,
            amount: row.amount,
        }
    }
}
