//! SQLite storage implementation for the SME screener.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `sme-screener-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations, including the legacy staging tables
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain, ETL, scoring)
//!                  │
//!                  ▼
//!        storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
mod utils;

// Repository implementations
pub mod analysis_runs;
pub mod companies;
pub mod financials;
pub mod metrics;
pub mod saved_lists;
pub mod staging;

#[cfg(test)]
mod test_support;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, snapshot_database, spawn_writer,
    DbConnection, DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export repositories
pub use analysis_runs::AnalysisRunRepository;
pub use companies::CompanyRepository;
pub use financials::FinancialsRepository;
pub use metrics::MetricsRepository;
pub use saved_lists::SavedListRepository;
pub use staging::StagingRepository;

// Re-export from sme-screener-core for convenience
pub use sme_screener_core::errors::{DatabaseError, Error, Result};
