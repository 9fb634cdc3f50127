use crate::errors::Result;
use crate::saved_lists::saved_lists_model::{NewSavedList, SavedList, SavedListUpdate};
use async_trait::async_trait;

/// Trait for saved list repository operations
#[async_trait]
pub trait SavedListRepositoryTrait: Send + Sync {
    fn list_saved_lists(&self) -> Result<Vec<SavedList>>;
    fn get_saved_list(&self, list_id: &str) -> Result<SavedList>;
    async fn insert_saved_list(&self, list: SavedList) -> Result<SavedList>;
    async fn update_saved_list(&self, list: SavedList) -> Result<SavedList>;
    async fn delete_saved_list(&self, list_id: String) -> Result<usize>;
    /// Adds items, ignoring orgnrs already on the list. Returns rows inserted.
    async fn add_list_items(&self, list_id: String, orgnrs: Vec<String>) -> Result<usize>;
    async fn remove_list_item(&self, list_id: String, orgnr: String) -> Result<usize>;
}

/// Trait for saved list service operations
#[async_trait]
pub trait SavedListServiceTrait: Send + Sync {
    fn list(&self) -> Result<Vec<SavedList>>;
    fn get(&self, list_id: &str) -> Result<SavedList>;
    async fn create(&self, new_list: NewSavedList) -> Result<SavedList>;
    async fn update(&self, update: SavedListUpdate) -> Result<SavedList>;
    async fn delete(&self, list_id: String) -> Result<usize>;
    async fn add_companies(&self, list_id: String, orgnrs: Vec<String>) -> Result<SavedList>;
    async fn remove_company(&self, list_id: String, orgnr: String) -> Result<SavedList>;
}
