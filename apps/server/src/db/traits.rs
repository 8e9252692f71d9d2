//! Storage abstraction for company records

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    models::{Company, CompanyFields},
    Result,
};

/// Persistent storage for companies.
///
/// Implementations must keep `document_number` unique: `insert` and `update`
/// return `Error::DuplicateDocument` when the write would create a second
/// record with the same document number.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>>;

    /// Find the company holding `document_number`, ignoring `exclude_id`.
    async fn find_by_document(
        &self,
        document_number: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<Company>>;

    /// Store a new company. Identity and timestamps are assigned here.
    async fn insert(&self, fields: CompanyFields) -> Result<Company>;

    /// Overwrite all fields of `id`. Returns `None` if the record does not exist.
    async fn update(&self, id: Uuid, fields: CompanyFields) -> Result<Option<Company>>;

    /// Returns `false` if nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Number of companies whose social or legal name contains `search`
    /// (case-insensitive); all companies when `search` is `None`.
    async fn count_matching(&self, search: Option<&str>) -> Result<u64>;

    /// One page of matching companies ordered by creation time, then id.
    async fn paginate(&self, search: Option<&str>, offset: u64, limit: u32)
        -> Result<Vec<Company>>;
}
