//! SME Screener Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for screening Swedish SMEs as
//! acquisition targets. It is database-agnostic and defines repository traits
//! that are implemented by the `storage-sqlite` crate.

pub mod analysis_runs;
pub mod analytics;
pub mod companies;
pub mod constants;
pub mod errors;
pub mod export;
pub mod financials;
pub mod metrics;
pub mod migration;
pub mod saved_lists;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
