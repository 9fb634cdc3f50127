//! Analysis runs - persisted, ranked screenings of companies.

mod analysis_runs_model;
mod analysis_runs_service;
mod analysis_runs_traits;

pub use analysis_runs_model::{
    AnalysisResult, AnalysisRun, AnalysisStatus, NewAnalysisRun, DEFAULT_MAX_RESULTS,
    MAX_RESULTS_LIMIT,
};
pub use analysis_runs_service::{result_summary, AnalysisRunService};
pub use analysis_runs_traits::{AnalysisRunRepositoryTrait, AnalysisRunServiceTrait};
