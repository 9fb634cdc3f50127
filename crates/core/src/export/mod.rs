//! CSV export of the normalized tables.

mod export_model;
mod export_service;

pub use export_model::{ExportReport, ExportedFile};
pub use export_service::{
    ExportService, ExportServiceTrait, COMPANIES_FILE, FINANCIALS_FILE, METRICS_FILE,
};
