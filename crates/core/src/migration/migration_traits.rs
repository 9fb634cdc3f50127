use crate::errors::Result;
use crate::migration::migration_model::{
    MigrationOptions, MigrationReport, StagingCompany, StagingFinancialRow,
};
use async_trait::async_trait;

/// Read access to the legacy staging tables.
pub trait StagingRepositoryTrait: Send + Sync {
    fn count_staging_companies(&self) -> Result<i64>;
    /// Rows with `id > after_id`, ordered by id.
    fn load_companies_page(&self, after_id: i64, limit: usize) -> Result<Vec<StagingCompany>>;
    /// Financial rows whose orgnr matches one of `orgnrs` verbatim, ordered by id.
    fn load_financial_rows_for(&self, orgnrs: &[String]) -> Result<Vec<StagingFinancialRow>>;
}

#[async_trait]
pub trait MigrationServiceTrait: Send + Sync {
    async fn run(&self, options: MigrationOptions) -> Result<MigrationReport>;
}
