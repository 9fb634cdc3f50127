use crate::analysis_runs::analysis_runs_model::{AnalysisResult, AnalysisRun, NewAnalysisRun};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for analysis run repository operations
#[async_trait]
pub trait AnalysisRunRepositoryTrait: Send + Sync {
    /// Newest first.
    fn list_runs(&self) -> Result<Vec<AnalysisRun>>;
    fn get_run(&self, run_id: &str) -> Result<AnalysisRun>;
    /// Rank ascending.
    fn get_results(&self, run_id: &str) -> Result<Vec<AnalysisResult>>;
    async fn insert_run(&self, run: AnalysisRun) -> Result<AnalysisRun>;
    /// Overwrites status, counters, error and completion time.
    async fn update_run(&self, run: AnalysisRun) -> Result<AnalysisRun>;
    /// Stores the results and the finished run in one transaction.
    async fn complete_run(
        &self,
        run: AnalysisRun,
        results: Vec<AnalysisResult>,
    ) -> Result<AnalysisRun>;
    async fn delete_run(&self, run_id: String) -> Result<usize>;
}

/// Trait for analysis run service operations
#[async_trait]
pub trait AnalysisRunServiceTrait: Send + Sync {
    fn list_runs(&self) -> Result<Vec<AnalysisRun>>;
    fn get_run(&self, run_id: &str) -> Result<AnalysisRun>;
    fn get_run_results(&self, run_id: &str) -> Result<Vec<AnalysisResult>>;
    async fn create_run(&self, new_run: NewAnalysisRun) -> Result<AnalysisRun>;
    async fn delete_run(&self, run_id: String) -> Result<usize>;
}
