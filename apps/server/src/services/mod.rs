//! Business logic layer
//!
//! Services orchestrate operations by coordinating repositories,
//! the external registry, and business rules.

pub mod company;
pub mod document;
pub mod duplicates;
pub mod eligibility;
pub mod pagination;
pub mod validation;

pub use company::CompanyService;
pub use document::normalize_document;
pub use eligibility::EligibilityRule;
pub use pagination::Page;
pub use validation::validate_company;
