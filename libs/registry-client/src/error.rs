//! Error types for registry lookups

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Network failure, timeout, unexpected status or undecodable payload.
    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid document number for registry lookup: {0:?}")]
    InvalidDocument(String),

    #[error("Invalid registry configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
