//! Registry payload types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Company data as published by the registry.
///
/// Only the fields the service relies on are modelled; everything else in the
/// payload is ignored. Industry codes (CNAE) arrive either as JSON numbers or
/// as formatted strings and are kept as strings without further processing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    #[serde(default, deserialize_with = "deserialize_code")]
    pub cnpj: Option<String>,
    /// Legal name.
    #[serde(default)]
    pub razao_social: Option<String>,
    /// Trade name.
    #[serde(default)]
    pub nome_fantasia: Option<String>,
    #[serde(default)]
    pub data_inicio_atividade: Option<String>,
    /// Primary industry-classification code.
    #[serde(default, deserialize_with = "deserialize_code")]
    pub cnae_fiscal: Option<String>,
    #[serde(default)]
    pub cnae_fiscal_descricao: Option<String>,
    /// Secondary industry-classification codes. `null` decodes as empty.
    #[serde(default, deserialize_with = "deserialize_activities")]
    pub cnaes_secundarios: Vec<SecondaryActivity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryActivity {
    #[serde(default, deserialize_with = "deserialize_code")]
    pub codigo: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
}

impl RegistryRecord {
    /// Primary code followed by every secondary code present in the record.
    pub fn activity_codes(&self) -> impl Iterator<Item = &str> {
        self.cnae_fiscal.as_deref().into_iter().chain(
            self.cnaes_secundarios
                .iter()
                .filter_map(|activity| activity.codigo.as_deref()),
        )
    }
}

/// Outcome of a registry lookup that reached the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(RegistryRecord),
    /// The registry has no record for the document.
    NotFound { message: Option<String> },
}

/// How a "not found" answer is recognised in a registry response body.
///
/// The response is treated as "not found" when the JSON object carries
/// `field` with a non-null value and, if `value` is set, that value matches.
/// The default matches BrasilAPI's `{"type": "not_found"}`; other error types
/// (`service_error`, `bad_request`) are not "not found".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundRule {
    pub field: String,
    pub value: Option<String>,
}

impl Default for NotFoundRule {
    fn default() -> Self {
        Self {
            field: "type".to_string(),
            value: Some("not_found".to_string()),
        }
    }
}

impl NotFoundRule {
    pub fn matches(&self, body: &JsonValue) -> bool {
        let Some(marker) = body.get(&self.field) else {
            return false;
        };
        if marker.is_null() {
            return false;
        }
        match &self.value {
            None => true,
            Some(expected) => marker.as_str() == Some(expected.as_str()),
        }
    }
}

fn deserialize_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        JsonValue::String(s) => Some(s),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

fn deserialize_activities<'de, D>(deserializer: D) -> Result<Vec<SecondaryActivity>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<SecondaryActivity>>::deserialize(deserializer)?.unwrap_or_default())
}
