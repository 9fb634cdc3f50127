//! Database models for companies.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use sme_screener_core::companies::{Address, Company};

use crate::utils::decode_json_column;

/// Database model for companies
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::companies)]
#[diesel(primary_key(orgnr))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CompanyDB {
    pub orgnr: String,
    pub company_name: String,
    pub homepage: Option<String>,
    /// JSON object
    pub address: Option<String>,
    /// JSON array of strings
    pub segment_names: String,
    pub employees: Option<i32>,
    pub foundation_year: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Columns overwritten when an existing company is upserted; `created_at`
/// is left alone.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::companies)]
#[diesel(treat_none_as_null = true)]
pub struct CompanyChangesetDB {
    pub company_name: String,
    pub homepage: Option<String>,
    pub address: Option<String>,
    pub segment_names: String,
    pub employees: Option<i32>,
    pub foundation_year: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl From<&CompanyDB> for CompanyChangesetDB {
    fn from(db: &CompanyDB) -> Self {
        Self {
            company_name: db.company_name.clone(),
            homepage: db.homepage.clone(),
            address: db.address.clone(),
            segment_names: db.segment_names.clone(),
            employees: db.employees,
            foundation_year: db.foundation_year,
            updated_at: db.updated_at,
        }
    }
}

impl From<CompanyDB> for Company {
    fn from(db: CompanyDB) -> Self {
        let address = db
            .address
            .as_deref()
            .map(|raw| decode_json_column::<Address>("companies.address", raw))
            .filter(|a| !a.is_empty());
        Self {
            orgnr: db.orgnr,
            company_name: db.company_name,
            homepage: db.homepage,
            address,
            segment_names: decode_json_column("companies.segment_names", &db.segment_names),
            employees: db.employees,
            foundation_year: db.foundation_year,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Company> for CompanyDB {
    fn from(domain: Company) -> Self {
        let address = domain
            .address
            .filter(|a| !a.is_empty())
            .and_then(|a| serde_json::to_string(&a).ok());
        Self {
            orgnr: domain.orgnr,
            company_name: domain.company_name,
            homepage: domain.homepage,
            address,
            segment_names: serde_json::to_string(&domain.segment_names)
                .unwrap_or_else(|_| "[]".to_string()),
            employees: domain.employees,
            foundation_year: domain.foundation_year,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
