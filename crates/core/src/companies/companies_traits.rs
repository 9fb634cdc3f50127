use crate::companies::companies_model::{
    Company, CompanyDetail, CompanyFilter, CompanySearchResponse, CompanySort,
};
use crate::errors::Result;
use crate::financials::CompanyFinancial;
use async_trait::async_trait;

/// Trait for company repository operations
#[async_trait]
pub trait CompanyRepositoryTrait: Send + Sync {
    /// Page through companies joined with their metrics. `page` is 0-based.
    fn search_companies(
        &self,
        filter: &CompanyFilter,
        sort: &CompanySort,
        page: i64,
        page_size: i64,
    ) -> Result<CompanySearchResponse>;
    fn get_company(&self, orgnr: &str) -> Result<Company>;
    fn load_companies(&self) -> Result<Vec<Company>>;
    fn load_companies_by_orgnrs(&self, orgnrs: &[String]) -> Result<Vec<Company>>;
    fn count_companies(&self) -> Result<i64>;
    /// Inserts or updates companies keyed by orgnr, keeping `created_at` of
    /// existing rows.
    async fn upsert_companies(&self, companies: Vec<Company>) -> Result<usize>;
}

/// Trait for company service operations
#[async_trait]
pub trait CompanyServiceTrait: Send + Sync {
    fn search_companies(
        &self,
        filter: CompanyFilter,
        sort: CompanySort,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<CompanySearchResponse>;
    fn get_company(&self, orgnr: &str) -> Result<Company>;
    fn get_company_detail(&self, orgnr: &str) -> Result<CompanyDetail>;
    fn get_financials(&self, orgnr: &str) -> Result<Vec<CompanyFinancial>>;
}
