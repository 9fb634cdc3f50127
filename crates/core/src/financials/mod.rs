//! Financial statements per company and fiscal period.

mod financials_model;
mod financials_traits;

pub use financials_model::{financial_row_id, AccountCodes, CompanyFinancial};
pub use financials_traits::FinancialsRepositoryTrait;
