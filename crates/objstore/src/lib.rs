//! Object-storage bucket capability for wemanage.
//!
//! Thin client for a Supabase-storage-style REST API. The only contract the
//! application relies on is `ensure_bucket`: create-or-update with
//! "already exists is success" semantics.

mod client;
mod error;

pub use client::{BucketSpec, ObjectStore, VOICE_NOTES_SIZE_LIMIT};
pub use error::ObjStoreError;
