//! Typed error enum for the object-storage crate.

use thiserror::Error;

/// Errors from bucket operations.
#[derive(Debug, Error)]
pub enum ObjStoreError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}
