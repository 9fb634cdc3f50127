use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use sme_screener_core::export::ExportReport;
use sme_screener_storage_sqlite::db;
use tokio::task;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExportBody {
    include_database: bool,
}

async fn export(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ExportBody>>,
) -> ApiResult<Json<ExportReport>> {
    let include_database = body.map(|Json(b)| b.include_database).unwrap_or(false);
    let dir = state.export_dir.clone();
    let export_state = state.clone();

    let report = task::spawn_blocking(move || -> ApiResult<ExportReport> {
        let mut report = export_state.export_service.export_csv(&dir)?;
        if include_database {
            let name = format!(
                "screener_snapshot_{}.db",
                chrono::Utc::now().format("%Y%m%d_%H%M%S")
            );
            let snapshot = db::snapshot_database(&export_state.pool, &dir.join(name))?;
            report.database_snapshot = Some(snapshot);
        }
        Ok(report)
    })
    .await
    .map_err(|e| anyhow::anyhow!("Failed to execute export task: {}", e))??;

    tracing::info!("Exported {} files to {}", report.files.len(), report.directory);
    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/export", post(export))
}
