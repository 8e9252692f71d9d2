//! In-process `CompanyRepository`, used for the `memory` backend and tests

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::traits::CompanyRepository,
    models::{Company, CompanyFields},
    Error, Result,
};

/// Records are kept in insertion order, which matches `created_at, id` ordering
/// for everything written through this store.
#[derive(Default)]
pub struct InMemoryCompanyStore {
    companies: RwLock<Vec<Company>>,
}

impl InMemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.companies.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.companies.read().await.is_empty()
    }
}

fn matches_search(company: &Company, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => {
            company.social_name.to_lowercase().contains(needle)
                || company.legal_name.to_lowercase().contains(needle)
        }
    }
}

fn document_taken(companies: &[Company], document_number: &str, exclude_id: Option<Uuid>) -> bool {
    companies
        .iter()
        .any(|c| c.document_number == document_number && Some(c.id) != exclude_id)
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>> {
        let companies = self.companies.read().await;
        Ok(companies.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_document(
        &self,
        document_number: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<Company>> {
        let companies = self.companies.read().await;
        Ok(companies
            .iter()
            .find(|c| c.document_number == document_number && Some(c.id) != exclude_id)
            .cloned())
    }

    async fn insert(&self, fields: CompanyFields) -> Result<Company> {
        let mut companies = self.companies.write().await;
        if document_taken(&companies, &fields.document_number, None) {
            return Err(Error::DuplicateDocument {
                document_number: fields.document_number,
            });
        }

        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4(),
            document_number: fields.document_number,
            social_name: fields.social_name,
            legal_name: fields.legal_name,
            creation_date: fields.creation_date,
            responsible_email: fields.responsible_email,
            responsible_name: fields.responsible_name,
            created_at: now,
            updated_at: now,
        };
        companies.push(company.clone());
        Ok(company)
    }

    async fn update(&self, id: Uuid, fields: CompanyFields) -> Result<Option<Company>> {
        let mut companies = self.companies.write().await;
        let Some(index) = companies.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        if document_taken(&companies, &fields.document_number, Some(id)) {
            return Err(Error::DuplicateDocument {
                document_number: fields.document_number,
            });
        }

        let company = &mut companies[index];
        company.apply(fields, Utc::now());
        Ok(Some(company.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut companies = self.companies.write().await;
        let before = companies.len();
        companies.retain(|c| c.id != id);
        Ok(companies.len() < before)
    }

    async fn count_matching(&self, search: Option<&str>) -> Result<u64> {
        let needle = search.map(str::to_lowercase);
        let companies = self.companies.read().await;
        Ok(companies
            .iter()
            .filter(|c| matches_search(c, needle.as_deref()))
            .count() as u64)
    }

    async fn paginate(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Company>> {
        let needle = search.map(str::to_lowercase);
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let companies = self.companies.read().await;
        Ok(companies
            .iter()
            .filter(|c| matches_search(c, needle.as_deref()))
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
