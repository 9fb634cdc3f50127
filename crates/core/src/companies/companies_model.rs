//! Company domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::financials::CompanyFinancial;
use crate::metrics::{CompanyMetrics, GrowthCategory, ProfitabilityCategory, SizeCategory};

/// Postal/visiting address, stored as a JSON document on the company row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
            && self.municipality.is_none()
            && self.county.is_none()
    }
}

/// Domain model representing a legal entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub orgnr: String,
    pub company_name: String,
    pub homepage: Option<String>,
    pub address: Option<Address>,
    pub segment_names: Vec<String>,
    pub employees: Option<i32>,
    pub foundation_year: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Search filter for companies. Every field is optional; unset fields do not
/// restrict the result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFilter {
    /// Substring match on company name or orgnr
    pub query: Option<String>,
    pub segment: Option<String>,
    pub size_category: Option<SizeCategory>,
    pub growth_category: Option<GrowthCategory>,
    pub profitability_category: Option<ProfitabilityCategory>,
    pub min_revenue: Option<f64>,
    pub max_revenue: Option<f64>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
    pub min_fit_score: Option<i32>,
}

impl CompanyFilter {
    /// Trims text fields and drops empty ones.
    pub fn normalized(mut self) -> Self {
        self.query = non_empty(self.query);
        self.segment = non_empty(self.segment);
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CompanySortField {
    #[default]
    FitScore,
    Name,
    Revenue,
    RevenueCagr,
    EbitMargin,
    Employees,
}

impl CompanySortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fitScore" => Some(Self::FitScore),
            "name" => Some(Self::Name),
            "revenue" => Some(Self::Revenue),
            "revenueCagr" => Some(Self::RevenueCagr),
            "ebitMargin" => Some(Self::EbitMargin),
            "employees" => Some(Self::Employees),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanySort {
    pub field: CompanySortField,
    pub desc: bool,
}

impl Default for CompanySort {
    fn default() -> Self {
        Self {
            field: CompanySortField::FitScore,
            desc: true,
        }
    }
}

/// Clamps a requested page size to the supported range.
pub fn clamp_page_size(page_size: Option<i64>) -> i64 {
    page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

/// A company row in a search result, with its metrics when computed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyListItem {
    #[serde(flatten)]
    pub company: Company,
    pub metrics: Option<CompanyMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySearchResponse {
    pub data: Vec<CompanyListItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Everything the dashboard shows for a single company.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetail {
    pub company: Company,
    pub metrics: Option<CompanyMetrics>,
    pub financials: Vec<CompanyFinancial>,
}
