use crate::companies::Company;
use crate::errors::Result;
use crate::financials::CompanyFinancial;
use crate::metrics::metrics_model::{CompanyMetrics, RecomputeReport};
use async_trait::async_trait;

/// Trait for metrics repository operations
#[async_trait]
pub trait MetricsRepositoryTrait: Send + Sync {
    fn get_metrics(&self, orgnr: &str) -> Result<Option<CompanyMetrics>>;
    fn load_all_metrics(&self) -> Result<Vec<CompanyMetrics>>;
    async fn upsert_metrics(&self, metrics: Vec<CompanyMetrics>) -> Result<usize>;
}

/// Trait for metrics service operations
#[async_trait]
pub trait MetricsServiceTrait: Send + Sync {
    fn compute_metrics(&self, company: &Company, financials: &[CompanyFinancial])
        -> CompanyMetrics;
    fn get_metrics(&self, orgnr: &str) -> Result<Option<CompanyMetrics>>;
    async fn recompute_all(&self) -> Result<RecomputeReport>;
    async fn recompute_company(&self, orgnr: &str) -> Result<CompanyMetrics>;
}
