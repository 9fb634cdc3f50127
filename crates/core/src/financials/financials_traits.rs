use crate::errors::Result;
use crate::financials::CompanyFinancial;
use async_trait::async_trait;

/// Trait for financial statement repository operations
#[async_trait]
pub trait FinancialsRepositoryTrait: Send + Sync {
    /// All periods of a company, newest period first.
    fn get_financials(&self, orgnr: &str) -> Result<Vec<CompanyFinancial>>;
    fn load_financials_for(&self, orgnrs: &[String]) -> Result<Vec<CompanyFinancial>>;
    fn load_all_financials(&self) -> Result<Vec<CompanyFinancial>>;
    /// Deletes every row of the given companies and inserts `rows` instead.
    async fn replace_financials(
        &self,
        orgnrs: Vec<String>,
        rows: Vec<CompanyFinancial>,
    ) -> Result<usize>;
}
