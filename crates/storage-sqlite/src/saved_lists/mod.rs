mod model;
mod repository;

pub use model::{SavedListDB, SavedListItemDB};
pub use repository::SavedListRepository;
