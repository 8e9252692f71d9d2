//! Error taxonomy and its HTTP mapping.
//!
//! Every error response has the shape `{"errors": true, "message": "..."}`.
//! Validation failures additionally list the offending fields.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Document number {document_number} is already registered")]
    DuplicateDocument { document_number: String },

    #[error("Registry has no record for document number {document_number}")]
    RegistryNotFound { document_number: String },

    #[error("Company {document_number} does not have the required industry code")]
    IneligibleCompany { document_number: String },

    #[error("Company not found: {id}")]
    CompanyNotFound { id: String },

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, reason)])
    }

    pub fn company_not_found(id: impl fmt::Display) -> Self {
        Self::CompanyNotFound { id: id.to_string() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::DuplicateDocument { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::RegistryNotFound { .. }
            | Error::IneligibleCompany { .. }
            | Error::CompanyNotFound { .. } => StatusCode::NOT_FOUND,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::RegistryUnavailable(_) => StatusCode::BAD_GATEWAY,
            Error::Database(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to API clients. Internal details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            Error::Validation(_) => "Dados incompletos ou errados, por favor verifique.",
            Error::DuplicateDocument { .. } => {
                "Já existe uma empresa registrada com o documento enviado."
            }
            Error::RegistryNotFound { .. } => {
                "Não foi possível validar os dados da empresa, verifique se o CNPJ enviado está correto."
            }
            Error::IneligibleCompany { .. } => "Empresa não possui o CNAE necessário.",
            Error::CompanyNotFound { .. } => "Empresa não encontrada.",
            Error::PayloadTooLarge { .. } => "Requisição excede o tamanho máximo permitido.",
            Error::RegistryUnavailable(_) => {
                "Não foi possível consultar o cadastro nacional de empresas, tente novamente mais tarde."
            }
            Error::Database(_) | Error::Internal(_) => "Erro interno do servidor.",
        }
    }
}

impl From<company_registry_client::Error> for Error {
    fn from(e: company_registry_client::Error) -> Self {
        match e {
            company_registry_client::Error::Unavailable(message) => {
                Error::RegistryUnavailable(message)
            }
            other => Error::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let mut body = json!({
            "errors": true,
            "message": self.public_message(),
        });
        if let Error::Validation(fields) = &self {
            body["fields"] = json!(fields);
        }

        (status, Json(body)).into_response()
    }
}
