use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Raw reported account codes for one period, code -> amount as reported.
pub type AccountCodes = BTreeMap<String, f64>;

/// One reporting period of a company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFinancial {
    pub id: String,
    pub orgnr: String,
    pub year: i32,
    /// Fiscal period end, `YYYY-MM`
    pub period: String,
    pub currency: String,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    pub ebit: Option<f64>,
    pub ebitda: Option<f64>,
    pub employees: Option<i32>,
    pub account_codes: AccountCodes,
    pub created_at: NaiveDateTime,
}

/// Financial rows are keyed by orgnr and period so re-running the
/// migration overwrites instead of duplicating.
pub fn financial_row_id(orgnr: &str, period: &str) -> String {
    format!("{}_{}", orgnr, period)
}
