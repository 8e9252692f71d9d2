//! Shared harness for HTTP-level tests.
//!
//! Every test gets a fresh router backed by the in-memory store and a scripted
//! registry stub, driven through `tower::ServiceExt::oneshot`.

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use company_registry::{
    api::create_router,
    config::{Config, StorageBackend},
    db::InMemoryCompanyStore,
    state::AppState,
};
use company_registry_client::{
    CompanyRegistry, Error as RegistryError, Lookup, RegistryRecord, SecondaryActivity,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};
use tower::ServiceExt;

pub const ALLOWED_CNAE: &str = "4614100";
pub const VALID_DOCUMENT: &str = "12.345.678/0001-90";
pub const VALID_DOCUMENT_DIGITS: &str = "12345678000190";

/// Scripted answer for one document number.
#[derive(Debug, Clone)]
pub enum StubAnswer {
    Found {
        primary: Option<String>,
        secondary: Vec<String>,
    },
    NotFound,
    Unavailable,
}

impl StubAnswer {
    pub fn eligible() -> Self {
        StubAnswer::Found {
            primary: Some(ALLOWED_CNAE.to_string()),
            secondary: Vec::new(),
        }
    }

    pub fn ineligible() -> Self {
        StubAnswer::Found {
            primary: Some("6201501".to_string()),
            secondary: vec!["4729699".to_string()],
        }
    }
}

/// Registry double: answers from a script (eligible by default) and counts lookups.
pub struct StubRegistry {
    answers: Mutex<HashMap<String, StubAnswer>>,
    default_answer: Mutex<StubAnswer>,
    calls: AtomicUsize,
}

impl Default for StubRegistry {
    fn default() -> Self {
        Self {
            answers: Mutex::new(HashMap::new()),
            default_answer: Mutex::new(StubAnswer::eligible()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl StubRegistry {
    pub fn script(&self, document_number: &str, answer: StubAnswer) {
        self.answers
            .lock()
            .unwrap()
            .insert(document_number.to_string(), answer);
    }

    pub fn set_default(&self, answer: StubAnswer) {
        *self.default_answer.lock().unwrap() = answer;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompanyRegistry for StubRegistry {
    async fn lookup(&self, document_number: &str) -> company_registry_client::Result<Lookup> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let answer = self
            .answers
            .lock()
            .unwrap()
            .get(document_number)
            .cloned()
            .unwrap_or_else(|| self.default_answer.lock().unwrap().clone());

        match answer {
            StubAnswer::Found { primary, secondary } => Ok(Lookup::Found(RegistryRecord {
                cnpj: Some(document_number.to_string()),
                razao_social: Some("REGISTRY LEGAL NAME LTDA".to_string()),
                cnae_fiscal: primary,
                cnaes_secundarios: secondary
                    .into_iter()
                    .map(|codigo| SecondaryActivity {
                        codigo: Some(codigo),
                        descricao: None,
                    })
                    .collect(),
                ..RegistryRecord::default()
            })),
            StubAnswer::NotFound => Ok(Lookup::NotFound {
                message: Some(format!("CNPJ {document_number} não encontrado.")),
            }),
            StubAnswer::Unavailable => Err(RegistryError::Unavailable(
                "registry request timed out".to_string(),
            )),
        }
    }
}

pub struct TestApp {
    router: Router,
    pub store: Arc<InMemoryCompanyStore>,
    pub registry: Arc<StubRegistry>,
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(method, path, body, &[])
            .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut builder = Request::builder().method(method).uri(path);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        for (name, value) in extra_headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(body.map(Body::from).unwrap_or_else(Body::empty))?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await?.to_bytes();
        Ok((status, headers, bytes))
    }

    /// POST a company and return the created record, asserting 201.
    pub async fn create_company(&self, payload: &Value) -> anyhow::Result<Value> {
        let (status, _headers, body) = self
            .request(Method::POST, "/companies", Some(to_json_body(payload)?))
            .await?;
        assert_status(status, StatusCode::CREATED, "create company");
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn stored_count(&self) -> usize {
        self.store.len().await
    }
}

pub fn test_config() -> Config {
    let mut config = Config::defaults().expect("default configuration");
    config.database.backend = StorageBackend::Memory;
    config.registry.allowed_cnae = ALLOWED_CNAE.to_string();
    config
}

pub async fn with_test_app<F>(f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(&'a TestApp) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>,
{
    with_test_app_with_config(|_| {}, f).await
}

pub async fn with_test_app_with_config<C, F>(configure: C, f: F) -> anyhow::Result<()>
where
    C: FnOnce(&mut Config),
    F: for<'a> FnOnce(&'a TestApp) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>,
{
    let mut config = test_config();
    configure(&mut config);

    let store = Arc::new(InMemoryCompanyStore::new());
    let registry = Arc::new(StubRegistry::default());
    let state = AppState::with_components(config, store.clone(), registry.clone());

    let app = TestApp {
        router: create_router(state),
        store,
        registry,
    };
    f(&app).await
}

pub fn to_json_body(value: &Value) -> anyhow::Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

pub fn assert_status(got: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(got, expected, "unexpected status for {context}");
}

pub fn json_of(body: &Bytes) -> Value {
    serde_json::from_slice(body).expect("response body is JSON")
}

/// A payload that passes validation, with the given document number.
pub fn company_payload(document_number: &str) -> Value {
    json!({
        "document_number": document_number,
        "social_name": "Acme",
        "legal_name": "Acme Representações Ltda",
        "creation_date": "2015-03-02",
        "responsible_email": "owner@acme.com.br",
        "responsible_name": "Maria Souza"
    })
}

pub fn named_payload(document_number: &str, social_name: &str, legal_name: &str) -> Value {
    let mut payload = company_payload(document_number);
    payload["social_name"] = json!(social_name);
    payload["legal_name"] = json!(legal_name);
    payload
}
