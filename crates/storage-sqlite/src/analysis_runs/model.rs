use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::warn;
use sme_screener_core::analysis_runs::{AnalysisResult, AnalysisRun, AnalysisStatus};
use sme_screener_core::companies::CompanyFilter;

use crate::utils::decode_json_column;

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::analysis_runs)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AnalysisRunDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    /// JSON-encoded `CompanyFilter`
    pub filter_json: String,
    pub max_results: i32,
    pub result_count: i32,
    pub error_message: Option<String>,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::analysis_results)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AnalysisResultDB {
    pub id: String,
    pub run_id: String,
    pub orgnr: String,
    pub company_name: String,
    pub rank: i32,
    pub fit_score: i32,
    pub summary: String,
}

impl From<AnalysisRunDB> for AnalysisRun {
    fn from(db: AnalysisRunDB) -> Self {
        let status = db.status.parse().unwrap_or_else(|_| {
            warn!("Run {} has unknown status '{}'", db.id, db.status);
            AnalysisStatus::Failed
        });
        Self {
            filter: decode_json_column::<CompanyFilter>("analysis_runs.filter_json", &db.filter_json),
            status,
            id: db.id,
            name: db.name,
            description: db.description,
            max_results: db.max_results,
            result_count: db.result_count,
            error_message: db.error_message,
            created_at: db.created_at,
            completed_at: db.completed_at,
        }
    }
}

impl From<AnalysisRun> for AnalysisRunDB {
    fn from(domain: AnalysisRun) -> Self {
        Self {
            filter_json: serde_json::to_string(&domain.filter)
                .unwrap_or_else(|_| "{}".to_string()),
            status: domain.status.as_str().to_string(),
            id: domain.id,
            name: domain.name,
            description: domain.description,
            max_results: domain.max_results,
            result_count: domain.result_count,
            error_message: domain.error_message,
            created_at: domain.created_at,
            completed_at: domain.completed_at,
        }
    }
}

impl From<AnalysisResultDB> for AnalysisResult {
    fn from(db: AnalysisResultDB) -> Self {
        Self {
            id: db.id,
            run_id: db.run_id,
            orgnr: db.orgnr,
            company_name: db.company_name,
            rank: db.rank,
            fit_score: db.fit_score,
            summary: db.summary,
        }
    }
}

impl From<AnalysisResult> for AnalysisResultDB {
    fn from(domain: AnalysisResult) -> Self {
        Self {
            id: domain.id,
            run_id: domain.run_id,
            orgnr: domain.orgnr,
            company_name: domain.company_name,
            rank: domain.rank,
            fit_score: domain.fit_score,
            summary: domain.summary,
        }
    }
}
