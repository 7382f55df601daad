//! Shared constants for wemanage.
//!
//! Centralizes magic numbers that were previously duplicated across crates.

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Database created by `wemanage init` when `PGDATABASE` is not set.
pub const DEFAULT_DATABASE_NAME: &str = "wemanageall";

/// Maintenance database used for `CREATE DATABASE` in local mode.
pub const ADMIN_DATABASE_NAME: &str = "postgres";

/// Seconds between expired-session sweeps (override: `WEMANAGE_SESSION_SWEEP_SECS`).
pub const DEFAULT_SESSION_SWEEP_SECS: u64 = 900;

/// Session lifetime in seconds, 30 days (override: `WEMANAGE_SESSION_TTL_SECS`).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Upper bound on share codes accepted from the URL path.
/// Generated codes are 32 hex chars; anything longer is rejected outright.
pub const MAX_SHARE_CODE_LEN: usize = 64;

/// Maximum accepted email length (RFC 5321 forward-path limit).
pub const MAX_EMAIL_LEN: usize = 254;
