mod model;
mod repository;

pub use model::MetricsDB;
pub use repository::MetricsRepository;
