//! PostgreSQL storage layer for wemanage
//!
//! Owns the canonical schema, the migration tooling (statement splitter,
//! tolerant/atomic runners, catalog probes, applied-migrations ledger) and
//! the runtime stores: sessions, list sharing, accounts and the waitlist.

pub mod catalog;
pub mod classify;
pub mod config;
mod error;
pub mod ledger;
pub mod migrations;
mod pg;
pub mod runner;
pub mod schema;
pub mod traits;

pub use config::DbConfig;
pub use error::StorageError;
pub use pg::{rebuild_session_table, PgStorage};
pub use runner::{ApplyReport, StatementFailure};
pub use traits::{SessionStore, ShareStore, UserStore, WaitlistStore};
