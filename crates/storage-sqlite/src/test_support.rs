//! Fixtures shared by the repository tests.

use std::sync::Arc;

use chrono::NaiveDateTime;
use sme_screener_core::companies::Company;
use sme_screener_core::financials::{financial_row_id, CompanyFinancial};
use tempfile::{tempdir, TempDir};

use crate::db::{create_pool, init, run_migrations, spawn_writer, DbPool, WriteHandle};

/// A migrated database in a temp dir. Keep the `TempDir` alive for the
/// duration of the test.
pub async fn setup_db() -> (Arc<DbPool>, WriteHandle, TempDir) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = init(&temp_dir.path().join("test.db")).expect("Failed to init database");
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());
    (pool, writer, temp_dir)
}

pub fn ts(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").expect("valid timestamp")
}

pub fn company(orgnr: &str, name: &str) -> Company {
    Company {
        orgnr: orgnr.to_string(),
        company_name: name.to_string(),
        homepage: None,
        address: None,
        segment_names: Vec::new(),
        employees: None,
        foundation_year: None,
        created_at: ts("2024-01-01 00:00:00"),
        updated_at: ts("2024-01-01 00:00:00"),
    }
}

pub fn financial(orgnr: &str, year: i32, revenue: Option<f64>, ebit: Option<f64>) -> CompanyFinancial {
    let period = format!("{}-12", year);
    CompanyFinancial {
        id: financial_row_id(orgnr, &period),
        orgnr: orgnr.to_string(),
        year,
        period,
        currency: "SEK".to_string(),
        revenue,
        profit: None,
        ebit,
        ebitda: None,
        employees: None,
        account_codes: Default::default(),
        created_at: ts("2024-01-01 00:00:00"),
    }
}
