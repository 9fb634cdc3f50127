//! Analysis run domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::companies::CompanyFilter;
use crate::constants::MAX_NAME_LENGTH;
use crate::errors::{Error, Result, ValidationError};

pub const DEFAULT_MAX_RESULTS: i32 = 50;
pub const MAX_RESULTS_LIMIT: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "PENDING",
            AnalysisStatus::Running => "RUNNING",
            AnalysisStatus::Completed => "COMPLETED",
            AnalysisStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(AnalysisStatus::Pending),
            "RUNNING" => Ok(AnalysisStatus::Running),
            "COMPLETED" => Ok(AnalysisStatus::Completed),
            "FAILED" => Ok(AnalysisStatus::Failed),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown analysis status '{}'",
                other
            ))
            .into()),
        }
    }
}

/// A persisted screening: a named filter evaluated against the data at
/// `created_at`, with its ranked results stored separately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRun {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: AnalysisStatus,
    pub filter: CompanyFilter,
    pub max_results: i32,
    pub result_count: i32,
    pub error_message: Option<String>,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

/// Input model for creating an analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnalysisRun {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub filter: CompanyFilter,
    pub max_results: Option<i32>,
}

impl NewAnalysisRun {
    /// Checks the input and returns the trimmed name and effective result cap.
    pub fn validate(&self) -> Result<(String, i32)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::InvalidInput(format!(
                "name must be at most {} characters",
                MAX_NAME_LENGTH
            ))
            .into());
        }
        let max_results = self.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
            return Err(ValidationError::InvalidInput(format!(
                "maxResults must be between 1 and {}",
                MAX_RESULTS_LIMIT
            ))
            .into());
        }
        Ok((name.to_string(), max_results))
    }
}

/// One ranked company of an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub run_id: String,
    pub orgnr: String,
    pub company_name: String,
    pub rank: i32,
    pub fit_score: i32,
    pub summary: String,
}
