//! Core domain types and constants for wemanage
//!
//! This crate contains domain types shared across all other crates.

mod account;
mod constants;
mod env_config;
mod intentions;
mod lists;
mod session;
mod waitlist;

pub use account::*;
pub use constants::*;
pub use env_config::*;
pub use intentions::*;
pub use lists::*;
pub use session::*;
pub use waitlist::*;
