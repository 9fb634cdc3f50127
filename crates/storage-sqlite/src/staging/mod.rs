mod model;
mod repository;

pub use model::{NewStagingCompanyDB, NewStagingFinancialDB, StagingCompanyDB, StagingFinancialDB};
pub use repository::StagingRepository;
