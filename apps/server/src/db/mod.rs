//! Persistence layer

pub mod memory;
pub mod store;
pub mod traits;

pub use memory::InMemoryCompanyStore;
pub use store::PostgresCompanyStore;
pub use traits::CompanyRepository;
