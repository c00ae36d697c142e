//! Required-field validation for a merged configuration.
//!
//! Every violation is collected so a single startup failure names all of them.

use crate::error::{ConfigError, ConfigResult, FieldViolation};
use crate::model::{Configuration, DeliveryBackend};

const MISSING: &str = "missing";
const ZERO: &str = "must be non-zero";
const NOT_SET: &str = "must be set";

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn text(&mut self, field: &'static str, value: &str) {
        if value.is_empty() {
            self.0.push(FieldViolation::new(field, MISSING));
        }
    }

    fn number(&mut self, field: &'static str, value: u32) {
        if value == 0 {
            self.0.push(FieldViolation::new(field, ZERO));
        }
    }

    fn flag(&mut self, field: &'static str, value: bool) {
        if !value {
            self.0.push(FieldViolation::new(field, NOT_SET));
        }
    }
}

/// Check every required field of `config`.
///
/// Object storage fields are only required when `build_save_location`
/// selects that backend.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] listing each empty or zero required field.
pub fn validate(config: &Configuration) -> ConfigResult<()> {
    let mut violations = Violations::default();

    let db = &config.database.write;
    violations.text("db_username", &db.username);
    violations.text("db_password", &db.password);
    violations.text("db_host", &db.host);
    violations.number("db_port", db.port);
    violations.text("db_name", &db.name);

    violations.text("redis_host", &config.cache.host);
    violations.number("redis_port", config.cache.port);

    let artifacts = &config.artifacts;
    violations.text("build_save_location", &artifacts.build_save_location);
    if artifacts.backend() == DeliveryBackend::ObjectStorage {
        let s3 = &artifacts.object_storage;
        violations.text("aws_s3_endpoint", &s3.endpoint);
        violations.text("aws_region", &s3.region);
        violations.flag("aws_s3_force_path_style", s3.force_path_style);
        violations.text("aws_access_key_id", &s3.access_key_id);
        violations.text("aws_secret_access_key", &s3.secret_access_key);
        violations.text("aws_s3_bucket_name", &s3.bucket);
    }

    violations.text("resource_url", &config.resource_url);
    violations.text("environment", &config.environment);
    violations.text("tenant_name", &config.tenant_name);

    if violations.0.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation {
            violations: violations.0,
        })
    }
}
