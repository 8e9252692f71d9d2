//! PostgreSQL-backed `CompanyRepository` implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::traits::CompanyRepository,
    models::{Company, CompanyFields},
    Error, Result,
};

const COMPANY_COLUMNS: &str = "id, document_number, social_name, legal_name, creation_date, \
     responsible_email, responsible_name, created_at, updated_at";

/// PostgreSQL-backed CompanyRepository implementation
#[derive(Clone)]
pub struct PostgresCompanyStore {
    pub(crate) pool: PgPool,
}

impl PostgresCompanyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a unique-constraint violation on `document_number` to a domain error.
fn map_write_error(e: sqlx::Error, document_number: &str) -> Error {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return Error::DuplicateDocument {
                document_number: document_number.to_string(),
            };
        }
    }
    Error::Database(e)
}

/// Build an ILIKE pattern matching `search` literally anywhere in the value.
fn contains_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl CompanyRepository for PostgresCompanyStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1");
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(company)
    }

    async fn find_by_document(
        &self,
        document_number: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<Company>> {
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM companies
             WHERE document_number = $1
               AND ($2::UUID IS NULL OR id <> $2)
             LIMIT 1"
        );
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(document_number)
            .bind(exclude_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(company)
    }

    async fn insert(&self, fields: CompanyFields) -> Result<Company> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO companies ({COMPANY_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
             RETURNING {COMPANY_COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&sql)
            .bind(Uuid::new_v4())
            .bind(&fields.document_number)
            .bind(&fields.social_name)
            .bind(&fields.legal_name)
            .bind(fields.creation_date)
            .bind(&fields.responsible_email)
            .bind(&fields.responsible_name)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &fields.document_number))
    }

    async fn update(&self, id: Uuid, fields: CompanyFields) -> Result<Option<Company>> {
        let sql = format!(
            "UPDATE companies
             SET document_number = $2,
                 social_name = $3,
                 legal_name = $4,
                 creation_date = $5,
                 responsible_email = $6,
                 responsible_name = $7,
                 updated_at = $8
             WHERE id = $1
             RETURNING {COMPANY_COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&sql)
            .bind(id)
            .bind(&fields.document_number)
            .bind(&fields.social_name)
            .bind(&fields.legal_name)
            .bind(fields.creation_date)
            .bind(&fields.responsible_email)
            .bind(&fields.responsible_name)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &fields.document_number))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_matching(&self, search: Option<&str>) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM companies
             WHERE $1::TEXT IS NULL
                OR social_name ILIKE $1
                OR legal_name ILIKE $1",
        )
        .bind(search.map(contains_pattern))
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn paginate(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Company>> {
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM companies
             WHERE $1::TEXT IS NULL
                OR social_name ILIKE $1
                OR legal_name ILIKE $1
             ORDER BY created_at ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        let offset = i64::try_from(offset)
            .map_err(|_| Error::validation("page", "is out of range"))?;
        let companies = sqlx::query_as::<_, Company>(&sql)
            .bind(search.map(contains_pattern))
            .bind(i64::from(limit))
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(companies)
    }
}
