//! Companies module - domain models, services, and traits.

mod companies_model;
mod companies_service;
mod companies_traits;

pub use companies_model::{
    clamp_page_size, Address, Company, CompanyDetail, CompanyFilter, CompanyListItem,
    CompanySearchResponse, CompanySort, CompanySortField,
};
pub use companies_service::CompanyService;
pub use companies_traits::{CompanyRepositoryTrait, CompanyServiceTrait};
