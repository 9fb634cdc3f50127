use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use sme_screener_core::metrics::{CompanyMetrics, RecomputeReport};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn get_company_metrics(
    State(state): State<Arc<AppState>>,
    Path(orgnr): Path<String>,
) -> ApiResult<Json<CompanyMetrics>> {
    state
        .metrics_service
        .get_metrics(&orgnr)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No metrics computed for {}", orgnr)))
}

async fn recompute_all(State(state): State<Arc<AppState>>) -> ApiResult<Json<RecomputeReport>> {
    let report = state.metrics_service.recompute_all().await?;
    tracing::info!(
        "Recomputed metrics for {} companies in {} ms",
        report.companies,
        report.duration_ms
    );
    Ok(Json(report))
}

async fn recompute_company(
    State(state): State<Arc<AppState>>,
    Path(orgnr): Path<String>,
) -> ApiResult<Json<CompanyMetrics>> {
    let metrics = state.metrics_service.recompute_company(&orgnr).await?;
    Ok(Json(metrics))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/companies/{orgnr}/metrics", get(get_company_metrics))
        .route("/metrics/recompute", post(recompute_all))
        .route("/metrics/recompute/{orgnr}", post(recompute_company))
}
