//! Domain models

pub mod company;

pub use company::{Company, CompanyFields, CompanyPayload, ListParams};
