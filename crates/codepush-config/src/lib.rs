#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Environment-backed configuration for the codepush server.
//!
//! Four JSON secret groups (`global_secrets`, `tenant_secrets`,
//! `service_secrets`, `db_secrets`) are merged over hard-coded defaults,
//! validated, and cached once per process.
//!
//! Layout: `model.rs` (typed configuration), `source.rs` (secret groups and
//! environment access), `keys.rs` (key routing and coercion), `loader.rs`
//! (`ConfigLoader`), `validate.rs` (required fields), `cell.rs` (one-time
//! initialisation and the process-wide accessor).

pub mod cell;
pub mod defaults;
pub mod error;
pub mod keys;
pub mod loader;
pub mod model;
pub mod source;
pub mod validate;

pub use cell::{ConfigCell, get_configuration, try_get_configuration};
pub use error::{ConfigError, ConfigResult, FieldViolation};
pub use keys::RECOGNIZED_KEYS;
pub use loader::{ConfigLoader, load_configuration};
pub use model::{
    ArtifactDistribution, CacheSettings, Configuration, DatabaseEndpoint, DatabaseSettings,
    DeliveryBackend, LocalDelivery, ObjectStorageDelivery, TransferDelivery,
};
pub use source::{ProcessEnv, SecretGroup, SecretSource, StaticSecrets};
pub use validate::validate;
