//! Company registry service
//!
//! CRUD over company registrations. Writes are accepted only for documents
//! that are unique locally, known to the national registry, and declare the
//! allowed industry code.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

pub use error::{Error, Result};
