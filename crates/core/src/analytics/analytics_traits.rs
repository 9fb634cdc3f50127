use crate::analytics::analytics_model::DashboardSummary;
use crate::errors::Result;

pub trait AnalyticsServiceTrait: Send + Sync {
    fn get_dashboard_summary(&self) -> Result<DashboardSummary>;
}
