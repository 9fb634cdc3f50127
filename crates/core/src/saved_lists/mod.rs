//! Saved lists - user-curated company lists.

mod saved_lists_model;
mod saved_lists_service;
mod saved_lists_traits;

pub use saved_lists_model::{validate_list_name, NewSavedList, SavedList, SavedListUpdate};
pub use saved_lists_service::SavedListService;
pub use saved_lists_traits::{SavedListRepositoryTrait, SavedListServiceTrait};
