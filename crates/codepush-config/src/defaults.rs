//! Hard-coded defaults applied before any secret group is merged.
//!
//! # Design
//! - Pool tuning is never sourced from secrets; these values are final.
//! - Keep every startup default in one place for auditability.

/// Maximum idle connections kept in the database pool.
pub const DB_MAX_IDLE_CONNS: u32 = 5;
/// Maximum open connections allowed by the database pool.
pub const DB_MAX_OPEN_CONNS: u32 = 20;
/// Maximum lifetime of a pooled database connection, in seconds.
pub const DB_CONN_MAX_LIFETIME_SECS: u32 = 300;
/// Listen address handed to the HTTP server.
pub const LISTEN_PORT: &str = ":8080";
/// URL prefix the HTTP routes are mounted under.
pub const URL_PREFIX: &str = "/";
/// Access token expiry window in days.
pub const TOKEN_EXPIRY_DAYS: u32 = 1;
