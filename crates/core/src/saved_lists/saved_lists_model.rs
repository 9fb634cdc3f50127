//! Saved list domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::companies::CompanyFilter;
use crate::constants::MAX_NAME_LENGTH;
use crate::errors::{Result, ValidationError};

/// A user-curated list of companies, optionally with the filter that
/// produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedList {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub filter: Option<CompanyFilter>,
    pub orgnrs: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new saved list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavedList {
    pub name: String,
    pub description: Option<String>,
    pub filter: Option<CompanyFilter>,
    #[serde(default)]
    pub orgnrs: Vec<String>,
}

/// Input model for renaming or re-describing a saved list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedListUpdate {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub filter: Option<CompanyFilter>,
}

/// Trims a list name and checks it is non-empty and not too long.
pub fn validate_list_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField("name".to_string()).into());
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::InvalidInput(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        ))
        .into());
    }
    Ok(trimmed.to_string())
}

pub(crate) fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
