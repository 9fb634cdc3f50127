use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use sme_screener_core::{
    analysis_runs::{AnalysisRunService, AnalysisRunServiceTrait},
    analytics::{AnalyticsService, AnalyticsServiceTrait},
    companies::{CompanyService, CompanyServiceTrait},
    export::{ExportService, ExportServiceTrait},
    metrics::{MetricsService, MetricsServiceTrait},
    migration::{MigrationService, MigrationServiceTrait},
    saved_lists::{SavedListService, SavedListServiceTrait},
};
use sme_screener_storage_sqlite::{
    db::{self, DbPool},
    AnalysisRunRepository, CompanyRepository, FinancialsRepository, MetricsRepository,
    SavedListRepository, StagingRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub company_service: Arc<dyn CompanyServiceTrait + Send + Sync>,
    pub metrics_service: Arc<dyn MetricsServiceTrait + Send + Sync>,
    pub analytics_service: Arc<dyn AnalyticsServiceTrait + Send + Sync>,
    pub analysis_run_service: Arc<dyn AnalysisRunServiceTrait + Send + Sync>,
    pub saved_list_service: Arc<dyn SavedListServiceTrait + Send + Sync>,
    pub migration_service: Arc<dyn MigrationServiceTrait + Send + Sync>,
    pub export_service: Arc<dyn ExportServiceTrait + Send + Sync>,
    /// Read pool, used directly for database snapshots
    pub pool: Arc<DbPool>,
    pub db_path: String,
    pub export_dir: PathBuf,
}

pub fn init_tracing() {
    let log_format = std::env::var("SME_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `init` also installs the `log` bridge, so library crates show up here.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(Path::new(&config.db_path))?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let company_repository = Arc::new(CompanyRepository::new(pool.clone(), writer.clone()));
    let financials_repository = Arc::new(FinancialsRepository::new(pool.clone(), writer.clone()));
    let metrics_repository = Arc::new(MetricsRepository::new(pool.clone(), writer.clone()));
    let staging_repository = Arc::new(StagingRepository::new(pool.clone(), writer.clone()));
    let analysis_run_repository =
        Arc::new(AnalysisRunRepository::new(pool.clone(), writer.clone()));
    let saved_list_repository = Arc::new(SavedListRepository::new(pool.clone(), writer.clone()));

    let company_service = Arc::new(CompanyService::new(
        company_repository.clone(),
        financials_repository.clone(),
        metrics_repository.clone(),
    ));
    let metrics_service = Arc::new(MetricsService::new(
        company_repository.clone(),
        financials_repository.clone(),
        metrics_repository.clone(),
        config.scoring,
    ));
    let analytics_service = Arc::new(AnalyticsService::new(
        company_repository.clone(),
        metrics_repository.clone(),
    ));
    let analysis_run_service = Arc::new(AnalysisRunService::new(
        analysis_run_repository,
        company_repository.clone(),
    ));
    let saved_list_service = Arc::new(SavedListService::new(
        saved_list_repository,
        company_repository.clone(),
    ));
    let migration_service = Arc::new(MigrationService::new(
        staging_repository,
        company_repository.clone(),
        financials_repository.clone(),
        metrics_repository.clone(),
        config.scoring,
    ));
    let export_service = Arc::new(ExportService::new(
        company_repository,
        financials_repository,
        metrics_repository,
    ));

    Ok(Arc::new(AppState {
        company_service,
        metrics_service,
        analytics_service,
        analysis_run_service,
        saved_list_service,
        migration_service,
        export_service,
        pool,
        db_path,
        export_dir: config.export_dir.clone(),
    }))
}
