//! Company service - write pipeline and data access for company records
//!
//! Create and update run the same verification chain before anything is
//! written:
//!
//! 1. field validation (document number normalized here)
//! 2. duplicate document check against the store
//! 3. registry lookup by document number
//! 4. industry-code eligibility of the registry record
//!
//! The first failing step ends the operation; nothing is persisted on failure.
//! Updates only re-run steps 2-4 when the normalized document number changes.

use crate::{
    config::PaginationConfig,
    db::CompanyRepository,
    models::{Company, CompanyPayload, ListParams},
    services::{
        duplicates::has_duplicate_document, eligibility::EligibilityRule, pagination::Page,
        validation::validate_company,
    },
    Error, Result,
};
use company_registry_client::{CompanyRegistry, Lookup};
use std::sync::Arc;
use uuid::Uuid;

pub struct CompanyService {
    repository: Arc<dyn CompanyRepository>,
    registry: Arc<dyn CompanyRegistry>,
    eligibility: EligibilityRule,
    pagination: PaginationConfig,
}

impl CompanyService {
    pub fn new(
        repository: Arc<dyn CompanyRepository>,
        registry: Arc<dyn CompanyRegistry>,
        eligibility: EligibilityRule,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            repository,
            registry,
            eligibility,
            pagination,
        }
    }

    /// Create a new company (POST /companies)
    pub async fn create(&self, payload: CompanyPayload) -> Result<Company> {
        let fields = validate_company(payload)?;

        self.verify_document(&fields.document_number, None).await?;

        let company = self.repository.insert(fields).await?;
        tracing::info!(
            company_id = %company.id,
            document_number = %company.document_number,
            "Company created"
        );
        Ok(company)
    }

    /// Replace every field of an existing company (PUT /companies/{id})
    pub async fn update(&self, id: Uuid, payload: CompanyPayload) -> Result<Company> {
        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::company_not_found(id))?;

        let fields = validate_company(payload)?;

        if fields.document_number != existing.document_number {
            self.verify_document(&fields.document_number, Some(id))
                .await?;
        } else {
            tracing::debug!(
                company_id = %id,
                "Document number unchanged, skipping registry verification"
            );
        }

        // The record can disappear between the read above and this write.
        let company = self
            .repository
            .update(id, fields)
            .await?
            .ok_or_else(|| Error::company_not_found(id))?;
        tracing::info!(
            company_id = %company.id,
            document_number = %company.document_number,
            "Company updated"
        );
        Ok(company)
    }

    pub async fn get(&self, id: Uuid) -> Result<Company> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::company_not_found(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(Error::company_not_found(id));
        }
        tracing::info!(company_id = %id, "Company deleted");
        Ok(())
    }

    pub async fn list(&self, params: ListParams) -> Result<Page<Company>> {
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let total = self.repository.count_matching(search).await?;
        let items = self
            .repository
            .paginate(search, params.offset(), params.limit)
            .await?;

        Ok(Page::build(params.page, params.limit, total, items))
    }

    /// Apply defaults and bounds to raw listing parameters.
    pub fn list_params(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        search: Option<String>,
    ) -> Result<ListParams> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(Error::validation("page", "must be >= 1"));
        }

        let limit = limit.unwrap_or(self.pagination.default_limit);
        if limit == 0 || limit > self.pagination.max_limit {
            return Err(Error::validation(
                "limit",
                format!("must be between 1 and {}", self.pagination.max_limit),
            ));
        }

        Ok(ListParams {
            page,
            limit,
            search,
        })
    }

    /// Duplicate check, registry lookup and eligibility, in that order.
    ///
    /// The local duplicate check runs first so a known conflict never costs a
    /// registry call.
    async fn verify_document(&self, document_number: &str, exclude_id: Option<Uuid>) -> Result<()> {
        if has_duplicate_document(self.repository.as_ref(), document_number, exclude_id).await? {
            tracing::warn!(document_number, "Rejected write: document already registered");
            return Err(Error::DuplicateDocument {
                document_number: document_number.to_string(),
            });
        }

        let record = match self.registry.lookup(document_number).await {
            Ok(Lookup::Found(record)) => record,
            Ok(Lookup::NotFound { message }) => {
                tracing::warn!(
                    document_number,
                    registry_message = ?message,
                    "Rejected write: document unknown to registry"
                );
                return Err(Error::RegistryNotFound {
                    document_number: document_number.to_string(),
                });
            }
            Err(e) => {
                tracing::error!(document_number, error = %e, "Registry lookup failed");
                return Err(e.into());
            }
        };

        if !self.eligibility.is_eligible(&record) {
            tracing::warn!(
                document_number,
                primary_code = ?record.cnae_fiscal,
                secondary_codes = record.cnaes_secundarios.len(),
                allowed_code = self.eligibility.allowed_code(),
                "Rejected write: company lacks the allowed industry code"
            );
            return Err(Error::IneligibleCompany {
                document_number: document_number.to_string(),
            });
        }

        tracing::debug!(
            document_number,
            legal_name = ?record.razao_social,
            "Document verified against registry"
        );
        Ok(())
    }
}
