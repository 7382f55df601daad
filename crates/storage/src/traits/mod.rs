//! Storage trait abstraction
//!
//! Defines async domain traits for the runtime stores, keeping handlers and
//! services off concrete SQL.

pub mod session;
pub mod sharing;
pub mod user;
pub mod waitlist;

pub use session::SessionStore;
pub use sharing::ShareStore;
pub use user::UserStore;
pub use waitlist::WaitlistStore;
