mod model;
mod repository;

pub use model::{AnalysisResultDB, AnalysisRunDB};
pub use repository::AnalysisRunRepository;
