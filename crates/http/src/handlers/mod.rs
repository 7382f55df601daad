pub mod share;
pub mod waitlist;
