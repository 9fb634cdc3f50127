//! Migration module - ETL from the legacy staging tables into companies,
//! financials and metrics.

pub mod field_mapping;
mod migration_model;
mod migration_service;
mod migration_traits;
pub mod pivot;

pub use migration_model::{
    MigrationOptions, MigrationReport, StagingCompany, StagingFinancialRow, DEFAULT_BATCH_SIZE,
    MAX_BATCH_SIZE, MAX_REPORTED_WARNINGS,
};
pub use migration_service::{map_staging_company, MigrationService};
pub use migration_traits::{MigrationServiceTrait, StagingRepositoryTrait};
