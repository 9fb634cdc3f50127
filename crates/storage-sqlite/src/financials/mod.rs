mod model;
mod repository;

pub use model::FinancialDB;
pub use repository::FinancialsRepository;
