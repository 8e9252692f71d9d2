//! Client for the national company registry (CNPJ lookup).
//!
//! The registry is queried by normalized document number and answers either
//! with the registered company data or with a "not found" marker. Transport
//! failures are reported as errors and are never folded into "not found".

pub mod client;
pub mod error;
pub mod models;

pub use client::{CompanyRegistry, RegistryClient, RegistryClientConfig};
pub use error::{Error, Result};
pub use models::{Lookup, NotFoundRule, RegistryRecord, SecondaryActivity};
