use log::debug;
use std::sync::Arc;

use super::companies_model::{
    clamp_page_size, Company, CompanyDetail, CompanyFilter, CompanySearchResponse, CompanySort,
};
use super::companies_traits::{CompanyRepositoryTrait, CompanyServiceTrait};
use crate::errors::Result;
use crate::financials::{CompanyFinancial, FinancialsRepositoryTrait};
use crate::metrics::MetricsRepositoryTrait;
use crate::utils::orgnr::normalize_orgnr;

/// Read side of the company dashboard.
pub struct CompanyService {
    repository: Arc<dyn CompanyRepositoryTrait>,
    financials_repository: Arc<dyn FinancialsRepositoryTrait>,
    metrics_repository: Arc<dyn MetricsRepositoryTrait>,
}

impl CompanyService {
    pub fn new(
        repository: Arc<dyn CompanyRepositoryTrait>,
        financials_repository: Arc<dyn FinancialsRepositoryTrait>,
        metrics_repository: Arc<dyn MetricsRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            financials_repository,
            metrics_repository,
        }
    }
}

impl CompanyServiceTrait for CompanyService {
    fn search_companies(
        &self,
        filter: CompanyFilter,
        sort: CompanySort,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<CompanySearchResponse> {
        let filter = filter.normalized();
        let page = page.unwrap_or(0).max(0);
        let page_size = clamp_page_size(page_size);
        debug!(
            "Searching companies: page={}, page_size={}, sort={:?}",
            page, page_size, sort
        );
        self.repository
            .search_companies(&filter, &sort, page, page_size)
    }

    fn get_company(&self, orgnr: &str) -> Result<Company> {
        let orgnr = normalize_orgnr(orgnr)?;
        self.repository.get_company(&orgnr)
    }

    fn get_company_detail(&self, orgnr: &str) -> Result<CompanyDetail> {
        let orgnr = normalize_orgnr(orgnr)?;
        let company = self.repository.get_company(&orgnr)?;
        let metrics = self.metrics_repository.get_metrics(&orgnr)?;
        let financials = self.financials_repository.get_financials(&orgnr)?;
        Ok(CompanyDetail {
            company,
            metrics,
            financials,
        })
    }

    /// Financial periods, newest first. Unknown companies are `NotFound`
    /// rather than an empty list.
    fn get_financials(&self, orgnr: &str) -> Result<Vec<CompanyFinancial>> {
        let orgnr = normalize_orgnr(orgnr)?;
        self.repository.get_company(&orgnr)?;
        self.financials_repository.get_financials(&orgnr)
    }
}
