//! Duplicate document detection

use crate::{db::CompanyRepository, Result};
use uuid::Uuid;

/// True when a stored company other than `exclude_id` already uses `document_number`.
pub async fn has_duplicate_document(
    repository: &dyn CompanyRepository,
    document_number: &str,
    exclude_id: Option<Uuid>,
) -> Result<bool> {
    Ok(repository
        .find_by_document(document_number, exclude_id)
        .await?
        .is_some())
}
