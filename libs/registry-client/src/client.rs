//! HTTP client for the registry lookup endpoint.

use crate::error::{Error, Result};
use crate::models::{Lookup, NotFoundRule, RegistryRecord};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value as JsonValue;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://brasilapi.com.br/api/cnpj/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Abstract interface for registry lookups.
#[async_trait]
pub trait CompanyRegistry: Send + Sync {
    /// Look up company data by normalized (digits-only) document number.
    async fn lookup(&self, document_number: &str) -> Result<Lookup>;
}

#[derive(Debug, Clone)]
pub struct RegistryClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub not_found: NotFoundRule,
}

impl Default for RegistryClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("company-registry/", env!("CARGO_PKG_VERSION")).to_string(),
            not_found: NotFoundRule::default(),
        }
    }
}

/// Registry client backed by `reqwest`.
///
/// Every lookup is a single GET to `{base_url}/{document_number}` bounded by
/// the configured timeout. There is no retry and no caching.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: Url,
    not_found: NotFoundRule,
}

impl RegistryClient {
    pub fn new(config: RegistryClientConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::InvalidConfig(format!("invalid base_url '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!(
                "base_url '{}' cannot be used as a base",
                config.base_url
            )));
        }
        // `Url::join` replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        if config.timeout.is_zero() {
            return Err(Error::InvalidConfig("timeout must be > 0".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            not_found: config.not_found,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn lookup_url(&self, document_number: &str) -> Result<Url> {
        if document_number.is_empty() || !document_number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidDocument(document_number.to_string()));
        }
        self.base_url
            .join(document_number)
            .map_err(|e| Error::InvalidConfig(format!("failed to build lookup URL: {e}")))
    }

    fn interpret(&self, status: reqwest::StatusCode, bytes: &[u8]) -> Result<Lookup> {
        // An outage is never "not found", whatever the body says.
        if status.is_server_error() {
            return Err(Error::Unavailable(format!(
                "registry responded with status {status}"
            )));
        }

        let body: Option<JsonValue> = serde_json::from_slice(bytes).ok();

        if let Some(body) = body.as_ref().filter(|b| self.not_found.matches(b)) {
            let message = body
                .get("message")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            return Ok(Lookup::NotFound { message });
        }

        if !status.is_success() {
            return Err(Error::Unavailable(format!(
                "registry responded with status {status}"
            )));
        }

        let body = body.ok_or_else(|| {
            Error::Unavailable("registry returned a non-JSON payload".to_string())
        })?;
        let record: RegistryRecord = serde_json::from_value(body)
            .map_err(|e| Error::Unavailable(format!("unexpected registry payload: {e}")))?;

        Ok(Lookup::Found(record))
    }
}

#[async_trait]
impl CompanyRegistry for RegistryClient {
    async fn lookup(&self, document_number: &str) -> Result<Lookup> {
        let url = self.lookup_url(document_number)?;
        tracing::debug!(document_number, %url, "Querying company registry");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(document_number, error = %e, "Registry request failed");
                transport_error(e)
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(document_number, error = %e, "Failed to read registry response");
            transport_error(e)
        })?;

        let lookup = self.interpret(status, &bytes);
        match &lookup {
            Ok(Lookup::Found(_)) => {
                tracing::debug!(document_number, %status, "Registry record found")
            }
            Ok(Lookup::NotFound { message }) => {
                tracing::info!(document_number, %status, ?message, "Registry has no record")
            }
            Err(e) => tracing::warn!(document_number, %status, error = %e, "Registry lookup failed"),
        }
        lookup
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Unavailable("registry request timed out".to_string())
    } else {
        Error::Unavailable(format!("registry request failed: {e}"))
    }
}
