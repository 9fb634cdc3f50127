use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use sme_screener_core::migration::{MigrationOptions, MigrationReport};

use crate::{error::ApiResult, main_lib::AppState};

/// Runs the staging migration to completion inside the request.
async fn run_etl(
    State(state): State<Arc<AppState>>,
    body: Option<Json<MigrationOptions>>,
) -> ApiResult<Json<MigrationReport>> {
    let options = body.map(|Json(o)| o).unwrap_or_default();
    tracing::info!(
        "ETL requested (dry run: {}, batch size: {})",
        options.dry_run,
        options.effective_batch_size()
    );
    let report = state.migration_service.run(options).await?;
    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/etl/run", post(run_etl))
}
