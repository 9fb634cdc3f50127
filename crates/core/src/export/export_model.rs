use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub name: String,
    pub path: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub directory: String,
    pub files: Vec<ExportedFile>,
    /// Path of the database snapshot, when one was requested
    pub database_snapshot: Option<String>,
}

/// Flattened `companies` row as written to CSV.
#[derive(Debug, Serialize)]
pub(crate) struct CompanyCsvRow<'a> {
    pub orgnr: &'a str,
    pub company_name: &'a str,
    pub homepage: Option<&'a str>,
    pub street: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub city: Option<&'a str>,
    pub municipality: Option<&'a str>,
    pub county: Option<&'a str>,
    pub segment_names: String,
    pub employees: Option<i32>,
    pub foundation_year: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct FinancialCsvRow<'a> {
    pub id: &'a str,
    pub orgnr: &'a str,
    pub year: i32,
    pub period: &'a str,
    pub currency: &'a str,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    pub ebit: Option<f64>,
    pub ebitda: Option<f64>,
    pub employees: Option<i32>,
    pub account_codes: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct MetricsCsvRow<'a> {
    pub orgnr: &'a str,
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
    pub size_category: &'static str,
    pub growth_category: &'static str,
    pub profitability_category: &'static str,
    pub fit_score: i32,
    pub calculated_at: String,
}
