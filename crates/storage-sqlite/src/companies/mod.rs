mod model;
mod repository;

pub use model::{CompanyChangesetDB, CompanyDB};
pub use repository::CompanyRepository;
