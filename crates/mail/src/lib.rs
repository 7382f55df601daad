//! HTML mail capability for wemanage.
//!
//! One explicitly constructed [`Mailer`] per process, injected where needed.
//! Unconfigured environments get a log-only implementation with the same
//! surface, so no caller has to care whether mail is wired up.

mod client;
mod error;

pub use client::{truncate, Mailer, MAX_LOGGED_BODY_LEN};
pub use error::MailError;
