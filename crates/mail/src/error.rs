//! Typed error enum for the mail crate.

use thiserror::Error;

/// Errors from mail API operations.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}
