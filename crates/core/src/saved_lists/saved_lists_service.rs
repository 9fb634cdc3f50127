use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use uuid::Uuid;

use super::saved_lists_model::{
    clean_description, validate_list_name, NewSavedList, SavedList, SavedListUpdate,
};
use super::saved_lists_traits::{SavedListRepositoryTrait, SavedListServiceTrait};
use crate::companies::CompanyRepositoryTrait;
use crate::errors::{Error, Result};
use crate::utils::orgnr::normalize_orgnr;
use crate::utils::time_utils::now_naive;

pub struct SavedListService {
    repository: Arc<dyn SavedListRepositoryTrait>,
    company_repository: Arc<dyn CompanyRepositoryTrait>,
}

impl SavedListService {
    pub fn new(
        repository: Arc<dyn SavedListRepositoryTrait>,
        company_repository: Arc<dyn CompanyRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            company_repository,
        }
    }

    /// Normalizes and dedupes orgnrs, failing on the first malformed one or
    /// on any that is not a known company.
    fn resolve_orgnrs(&self, raw: &[String]) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut orgnrs = Vec::with_capacity(raw.len());
        for value in raw {
            let orgnr = normalize_orgnr(value)?;
            if seen.insert(orgnr.clone()) {
                orgnrs.push(orgnr);
            }
        }
        if orgnrs.is_empty() {
            return Ok(orgnrs);
        }

        let known: HashSet<String> = self
            .company_repository
            .load_companies_by_orgnrs(&orgnrs)?
            .into_iter()
            .map(|c| c.orgnr)
            .collect();
        let missing: Vec<&str> = orgnrs
            .iter()
            .filter(|o| !known.contains(*o))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(Error::NotFound(format!(
                "Companies not found: {}",
                missing.join(", ")
            )));
        }
        Ok(orgnrs)
    }
}

#[async_trait]
impl SavedListServiceTrait for SavedListService {
    fn list(&self) -> Result<Vec<SavedList>> {
        self.repository.list_saved_lists()
    }

    fn get(&self, list_id: &str) -> Result<SavedList> {
        self.repository.get_saved_list(list_id)
    }

    async fn create(&self, new_list: NewSavedList) -> Result<SavedList> {
        let name = validate_list_name(&new_list.name)?;
        let orgnrs = self.resolve_orgnrs(&new_list.orgnrs)?;
        let now = now_naive();
        let list = SavedList {
            id: Uuid::new_v4().to_string(),
            name,
            description: clean_description(new_list.description),
            filter: new_list.filter.map(|f| f.normalized()),
            orgnrs,
            created_at: now,
            updated_at: now,
        };
        debug!("Creating saved list '{}'", list.name);
        self.repository.insert_saved_list(list).await
    }

    async fn update(&self, update: SavedListUpdate) -> Result<SavedList> {
        let name = validate_list_name(&update.name)?;
        let mut list = self.repository.get_saved_list(&update.id)?;
        list.name = name;
        list.description = clean_description(update.description);
        list.filter = update.filter.map(|f| f.normalized());
        list.updated_at = now_naive();
        self.repository.update_saved_list(list).await
    }

    async fn delete(&self, list_id: String) -> Result<usize> {
        self.repository.delete_saved_list(list_id).await
    }

    async fn add_companies(&self, list_id: String, orgnrs: Vec<String>) -> Result<SavedList> {
        self.repository.get_saved_list(&list_id)?;
        let orgnrs = self.resolve_orgnrs(&orgnrs)?;
        let added = self
            .repository
            .add_list_items(list_id.clone(), orgnrs)
            .await?;
        debug!("Added {} companies to saved list {}", added, list_id);
        self.repository.get_saved_list(&list_id)
    }

    async fn remove_company(&self, list_id: String, orgnr: String) -> Result<SavedList> {
        self.repository.get_saved_list(&list_id)?;
        let orgnr = normalize_orgnr(&orgnr)?;
        self.repository
            .remove_list_item(list_id.clone(), orgnr)
            .await?;
        self.repository.get_saved_list(&list_id)
    }
}
