use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sme_screener_core::analysis_runs::{AnalysisResult, AnalysisRun, NewAnalysisRun};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn list_runs(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<AnalysisRun>>> {
    let runs = state.analysis_run_service.list_runs()?;
    Ok(Json(runs))
}

async fn create_run(
    State(state): State<Arc<AppState>>,
    Json(new_run): Json<NewAnalysisRun>,
) -> ApiResult<(StatusCode, Json<AnalysisRun>)> {
    let run = state.analysis_run_service.create_run(new_run).await?;
    tracing::info!("Analysis run {} finished with {} results", run.id, run.result_count);
    Ok((StatusCode::CREATED, Json(run)))
}

async fn get_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<AnalysisRun>> {
    let run = state.analysis_run_service.get_run(&id)?;
    Ok(Json(run))
}

async fn get_run_results(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<AnalysisResult>>> {
    let results = state.analysis_run_service.get_run_results(&id)?;
    Ok(Json(results))
}

async fn delete_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let deleted = state.analysis_run_service.delete_run(id.clone()).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("Analysis run {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analysis-runs", get(list_runs).post(create_run))
        .route("/analysis-runs/{id}", get(get_run).delete(delete_run))
        .route("/analysis-runs/{id}/results", get(get_run_results))
}
