use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use sme_screener_core::analytics::{summarize, AnalyticsServiceTrait, DashboardSummary};

use crate::main_lib::AppState;

/// Falls back to the zero-filled summary of an empty database when loading
/// fails, so every category label is still present.
fn summary_or_empty(service: &dyn AnalyticsServiceTrait) -> DashboardSummary {
    match service.get_dashboard_summary() {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!("Dashboard summary unavailable, returning empty summary: {}", e);
            summarize(&[], &[])
        }
    }
}

async fn get_summary(State(state): State<Arc<AppState>>) -> Json<DashboardSummary> {
    Json(summary_or_empty(state.analytics_service.as_ref()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/analytics/summary", get(get_summary))
}
