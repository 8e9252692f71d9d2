//! Company records and the inputs that produce them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// A stored company registration.
///
/// `document_number` is always the normalized (digits-only) CNPJ and is
/// unique across all records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: Uuid,
    pub document_number: String,
    pub social_name: String,
    pub legal_name: String,
    pub creation_date: NaiveDate,
    pub responsible_email: String,
    pub responsible_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw create/update body as submitted by the client.
///
/// Every field is optional here so a missing field surfaces as a validation
/// error rather than a decoding failure. Numbers are accepted where strings
/// are expected (document numbers are often sent unquoted).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompanyPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub document_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub social_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub legal_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub creation_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub responsible_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub responsible_name: Option<String>,
}

/// Validated company data, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyFields {
    pub document_number: String,
    pub social_name: String,
    pub legal_name: String,
    pub creation_date: NaiveDate,
    pub responsible_email: String,
    pub responsible_name: String,
}

impl Company {
    /// Overwrite every mutable field, keeping identity and creation time.
    pub fn apply(&mut self, fields: CompanyFields, now: DateTime<Utc>) {
        self.document_number = fields.document_number;
        self.social_name = fields.social_name;
        self.legal_name = fields.legal_name;
        self.creation_date = fields.creation_date;
        self.responsible_email = fields.responsible_email;
        self.responsible_name = fields.responsible_name;
        self.updated_at = now;
    }
}

/// Listing parameters after defaults and bounds have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    /// Substring matched against `social_name` or `legal_name`.
    pub search: Option<String>,
}

impl ListParams {
    pub fn offset(&self) -> u64 {
        u64::from(self.limit) * u64::from(self.page.saturating_sub(1))
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) => Some(s),
        Some(JsonValue::Number(n)) => Some(n.to_string()),
        Some(JsonValue::Bool(b)) => Some(b.to_string()),
        // Arrays and objects never form a valid field; treat them as missing.
        Some(_) => None,
    })
}
