//! Typed configuration models.
//!
//! # Design
//! - Pure data carriers filled by the loader and read by the server.
//! - Secret material is skipped during serialisation and redacted in `Debug`.

use std::fmt::{self, Debug, Formatter};

use serde::Serialize;

use crate::defaults::{
    DB_CONN_MAX_LIFETIME_SECS, DB_MAX_IDLE_CONNS, DB_MAX_OPEN_CONNS, LISTEN_PORT,
    TOKEN_EXPIRY_DAYS, URL_PREFIX,
};

const REDACTED: &str = "<redacted>";

const fn redact(value: &str) -> &str {
    if value.is_empty() { value } else { REDACTED }
}

/// Root configuration handed to the server at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    /// Database endpoint and pool tuning.
    pub database: DatabaseSettings,
    /// Cache (Redis) connection settings.
    pub cache: CacheSettings,
    /// Build artifact distribution settings.
    pub artifacts: ArtifactDistribution,
    /// Prefix the HTTP routes are mounted under.
    pub url_prefix: String,
    /// Listen address for the HTTP server (for example `:8080`).
    pub port: String,
    /// Public base URL that artifacts are served from.
    pub resource_url: String,
    /// Access token expiry window in days.
    pub token_expiry_days: u32,
    /// Deployment environment name.
    pub environment: String,
    /// Tenant this process serves.
    pub tenant_name: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            database: DatabaseSettings::default(),
            cache: CacheSettings::default(),
            artifacts: ArtifactDistribution::default(),
            url_prefix: URL_PREFIX.to_string(),
            port: LISTEN_PORT.to_string(),
            resource_url: String::new(),
            token_expiry_days: TOKEN_EXPIRY_DAYS,
            environment: String::new(),
            tenant_name: String::new(),
        }
    }
}

/// Database write endpoint plus connection-pool tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseSettings {
    /// Credentials and address of the write endpoint.
    pub write: DatabaseEndpoint,
    /// Maximum idle connections kept in the pool.
    pub max_idle_conns: u32,
    /// Maximum open connections allowed by the pool.
    pub max_open_conns: u32,
    /// Maximum lifetime of a pooled connection, in seconds.
    pub conn_max_lifetime_secs: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            write: DatabaseEndpoint::default(),
            max_idle_conns: DB_MAX_IDLE_CONNS,
            max_open_conns: DB_MAX_OPEN_CONNS,
            conn_max_lifetime_secs: DB_CONN_MAX_LIFETIME_SECS,
        }
    }
}

/// Credentials for the database write endpoint.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseEndpoint {
    /// Login user.
    pub username: String,
    /// Login password.
    #[serde(skip_serializing)]
    pub password: String,
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u32,
    /// Database name.
    pub name: String,
}

impl Debug for DatabaseEndpoint {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DatabaseEndpoint")
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .finish()
    }
}

/// Cache connection settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheSettings {
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u32,
    /// Logical database index.
    pub db_index: u32,
    /// Optional ACL user.
    pub username: String,
    /// Optional ACL password.
    #[serde(skip_serializing)]
    pub password: String,
}

impl Debug for CacheSettings {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CacheSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_index", &self.db_index)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .finish()
    }
}

/// Where build artifacts are published and how.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactDistribution {
    /// Raw `build_save_location` value selecting the delivery backend.
    pub build_save_location: String,
    /// Local filesystem delivery.
    pub local: LocalDelivery,
    /// Object storage (S3-compatible) delivery.
    pub object_storage: ObjectStorageDelivery,
    /// File transfer (FTP) delivery.
    pub transfer: TransferDelivery,
}

impl ArtifactDistribution {
    /// Backend selected by `build_save_location`.
    #[must_use]
    pub fn backend(&self) -> DeliveryBackend {
        DeliveryBackend::from_location(&self.build_save_location)
    }
}

/// Delivery backend named by `build_save_location`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryBackend {
    /// Artifacts are written to the local filesystem.
    Local,
    /// Artifacts are uploaded to S3-compatible object storage.
    ObjectStorage,
    /// Artifacts are pushed to an FTP server.
    Transfer,
    /// Location value that does not name a known backend.
    Other(String),
}

impl DeliveryBackend {
    /// Interpret a `build_save_location` value (case-insensitive).
    #[must_use]
    pub fn from_location(location: &str) -> Self {
        match location.to_lowercase().as_str() {
            "local" => Self::Local,
            "aws" | "s3" => Self::ObjectStorage,
            "ftp" => Self::Transfer,
            _ => Self::Other(location.to_string()),
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::ObjectStorage => "object_storage",
            Self::Transfer => "transfer",
            Self::Other(value) => value,
        }
    }
}

/// Local filesystem delivery settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalDelivery {
    /// Directory bundles are saved to.
    pub save_path: String,
}

/// S3-compatible object storage delivery settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectStorageDelivery {
    /// Service endpoint URL.
    pub endpoint: String,
    /// Storage region.
    pub region: String,
    /// Use path-style bucket addressing.
    pub force_path_style: bool,
    /// Access key identifier.
    pub access_key_id: String,
    /// Secret access key.
    #[serde(skip_serializing)]
    pub secret_access_key: String,
    /// Target bucket.
    pub bucket: String,
}

impl Debug for ObjectStorageDelivery {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ObjectStorageDelivery")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("force_path_style", &self.force_path_style)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &redact(&self.secret_access_key))
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// FTP delivery settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferDelivery {
    /// Server URL.
    pub server_url: String,
    /// Login user.
    pub username: String,
    /// Login password.
    #[serde(skip_serializing)]
    pub password: String,
}

impl Debug for TransferDelivery {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TransferDelivery")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .finish()
    }
}
