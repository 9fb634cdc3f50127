use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sme_screener_core::companies::{
    CompanyDetail, CompanyFilter, CompanySearchResponse, CompanySort, CompanySortField,
};
use sme_screener_core::financials::CompanyFinancial;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Query string of `GET /companies`. Categories arrive as their display
/// labels and are parsed here so bad values get a JSON error body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanySearchQuery {
    q: Option<String>,
    segment: Option<String>,
    size_category: Option<String>,
    growth_category: Option<String>,
    profitability_category: Option<String>,
    min_revenue: Option<f64>,
    max_revenue: Option<f64>,
    min_employees: Option<i32>,
    max_employees: Option<i32>,
    min_fit_score: Option<i32>,
    sort: Option<String>,
    desc: Option<bool>,
    page: Option<i64>,
    page_size: Option<i64>,
}

fn parse_label<T: std::str::FromStr<Err = sme_screener_core::Error>>(
    value: Option<String>,
) -> ApiResult<Option<T>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => Ok(Some(label.parse()?)),
    }
}

impl CompanySearchQuery {
    fn into_parts(self) -> ApiResult<(CompanyFilter, CompanySort, Option<i64>, Option<i64>)> {
        let filter = CompanyFilter {
            query: self.q,
            segment: self.segment,
            size_category: parse_label(self.size_category)?,
            growth_category: parse_label(self.growth_category)?,
            profitability_category: parse_label(self.profitability_category)?,
            min_revenue: self.min_revenue,
            max_revenue: self.max_revenue,
            min_employees: self.min_employees,
            max_employees: self.max_employees,
            min_fit_score: self.min_fit_score,
        };
        let field = match self.sort.as_deref() {
            None | Some("") => CompanySortField::default(),
            Some(raw) => CompanySortField::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown sort field '{}'", raw)))?,
        };
        // Names read A-Z by default, figures best first.
        let desc = self.desc.unwrap_or(field != CompanySortField::Name);
        Ok((filter, CompanySort { field, desc }, self.page, self.page_size))
    }
}

async fn search_companies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompanySearchQuery>,
) -> ApiResult<Json<CompanySearchResponse>> {
    let (filter, sort, page, page_size) = query.into_parts()?;
    let result = state
        .company_service
        .search_companies(filter, sort, page, page_size)?;
    Ok(Json(result))
}

async fn get_company(
    State(state): State<Arc<AppState>>,
    Path(orgnr): Path<String>,
) -> ApiResult<Json<CompanyDetail>> {
    let detail = state.company_service.get_company_detail(&orgnr)?;
    Ok(Json(detail))
}

async fn get_financials(
    State(state): State<Arc<AppState>>,
    Path(orgnr): Path<String>,
) -> ApiResult<Json<Vec<CompanyFinancial>>> {
    let rows = state.company_service.get_financials(&orgnr)?;
    Ok(Json(rows))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/companies", get(search_companies))
        .route("/companies/{orgnr}", get(get_company))
        .route("/companies/{orgnr}/financials", get(get_financials))
}
