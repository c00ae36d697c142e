//! Routing of secret keys onto configuration fields.
//!
//! # Design
//! - A fixed key table replaces dynamic field lookup; unknown keys are ignored.
//! - Values are coerced with explicit type checks. A wrong JSON type is an
//!   error, while an unparsable number is tolerated and resets the field to zero.

use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::model::Configuration;
use crate::source::SecretGroup;

/// Every key the loader routes to a field, in lower case.
pub const RECOGNIZED_KEYS: [&str; 24] = [
    "db_username",
    "db_password",
    "db_host",
    "db_port",
    "db_name",
    "redis_host",
    "redis_port",
    "redis_db_index",
    "redis_username",
    "redis_password",
    "build_save_location",
    "local_build_save_path",
    "aws_s3_endpoint",
    "aws_region",
    "aws_s3_force_path_style",
    "aws_access_key_id",
    "aws_secret_access_key",
    "aws_s3_bucket_name",
    "ftp_server_url",
    "ftp_username",
    "ftp_password",
    "resource_url",
    "tenant_name",
    "environment",
];

const EXPECTED_STRING: &str = "a string";
const EXPECTED_NUMBER: &str = "an unsigned integer or numeric string";

/// Result of applying one key/value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The value was written to its field.
    Set,
    /// The key is not recognized; nothing changed.
    Ignored,
    /// The key expects a number but the value did not parse; the field was
    /// reset to zero, discarding any value an earlier group set.
    Unparsed,
}

enum Slot<'a> {
    Text(&'a mut String),
    Number(&'a mut u32),
    Flag(&'a mut bool),
}

fn slot<'a>(config: &'a mut Configuration, key: &str) -> Option<Slot<'a>> {
    let db = &mut config.database.write;
    let cache = &mut config.cache;
    let artifacts = &mut config.artifacts;
    let s3 = &mut artifacts.object_storage;
    let ftp = &mut artifacts.transfer;

    let slot = match key {
        "db_username" => Slot::Text(&mut db.username),
        "db_password" => Slot::Text(&mut db.password),
        "db_host" => Slot::Text(&mut db.host),
        "db_port" => Slot::Number(&mut db.port),
        "db_name" => Slot::Text(&mut db.name),

        "redis_host" => Slot::Text(&mut cache.host),
        "redis_port" => Slot::Number(&mut cache.port),
        "redis_db_index" => Slot::Number(&mut cache.db_index),
        "redis_username" => Slot::Text(&mut cache.username),
        "redis_password" => Slot::Text(&mut cache.password),

        "build_save_location" => Slot::Text(&mut artifacts.build_save_location),
        "local_build_save_path" => Slot::Text(&mut artifacts.local.save_path),

        "aws_s3_endpoint" => Slot::Text(&mut s3.endpoint),
        "aws_region" => Slot::Text(&mut s3.region),
        "aws_s3_force_path_style" => Slot::Flag(&mut s3.force_path_style),
        "aws_access_key_id" => Slot::Text(&mut s3.access_key_id),
        "aws_secret_access_key" => Slot::Text(&mut s3.secret_access_key),
        "aws_s3_bucket_name" => Slot::Text(&mut s3.bucket),

        "ftp_server_url" => Slot::Text(&mut ftp.server_url),
        "ftp_username" => Slot::Text(&mut ftp.username),
        "ftp_password" => Slot::Text(&mut ftp.password),

        "resource_url" => Slot::Text(&mut config.resource_url),
        "tenant_name" => Slot::Text(&mut config.tenant_name),
        "environment" => Slot::Text(&mut config.environment),
        _ => return None,
    };
    Some(slot)
}

/// Apply one secret key to `config`. Key matching is case-insensitive.
///
/// The path-style flag is set whenever its key is present, whatever the value.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] when a recognized key carries a JSON
/// type its field cannot hold.
pub fn apply_key(
    config: &mut Configuration,
    group: SecretGroup,
    key: &str,
    value: &Value,
) -> ConfigResult<Applied> {
    let key = key.to_lowercase();
    let Some(slot) = slot(config, &key) else {
        return Ok(Applied::Ignored);
    };

    let invalid = |expected| ConfigError::InvalidValue {
        variable: group.variable(),
        key: key.clone(),
        expected,
    };

    match slot {
        Slot::Text(field) => {
            let Value::String(text) = value else {
                return Err(invalid(EXPECTED_STRING));
            };
            text.clone_into(field);
            Ok(Applied::Set)
        }
        Slot::Number(field) => match coerce_number(value) {
            Coerced::Number(number) => {
                *field = number;
                Ok(Applied::Set)
            }
            Coerced::Unparsed => {
                *field = 0;
                Ok(Applied::Unparsed)
            }
            Coerced::WrongType => Err(invalid(EXPECTED_NUMBER)),
        },
        Slot::Flag(field) => {
            *field = true;
            Ok(Applied::Set)
        }
    }
}

enum Coerced {
    Number(u32),
    Unparsed,
    WrongType,
}

fn coerce_number(value: &Value) -> Coerced {
    let parsed = match value {
        Value::String(text) if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
            text.parse().ok()
        }
        Value::String(_) => None,
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => return Coerced::WrongType,
    };
    parsed.map_or(Coerced::Unparsed, Coerced::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(config: &mut Configuration, key: &str, value: &Value) -> ConfigResult<Applied> {
        apply_key(config, SecretGroup::Global, key, value)
    }

    #[test]
    fn every_recognized_key_has_a_field() {
        let mut config = Configuration::default();
        for key in RECOGNIZED_KEYS {
            assert!(slot(&mut config, key).is_some(), "{key} is not routed");
        }
        assert!(slot(&mut config, "unknown_key").is_none());
    }

    #[test]
    fn key_matching_ignores_case() -> ConfigResult<()> {
        let mut upper = Configuration::default();
        let mut lower = Configuration::default();
        apply(&mut upper, "DB_HOST", &json!("db.internal"))?;
        apply(&mut lower, "db_host", &json!("db.internal"))?;
        assert_eq!(upper, lower);
        assert_eq!(upper.database.write.host, "db.internal");

        apply(&mut upper, "Tenant_Name", &json!("acme"))?;
        assert_eq!(upper.tenant_name, "acme");
        Ok(())
    }

    #[test]
    fn numeric_strings_are_parsed() -> ConfigResult<()> {
        let mut config = Configuration::default();
        assert_eq!(apply(&mut config, "db_port", &json!("5432"))?, Applied::Set);
        assert_eq!(config.database.write.port, 5432);

        assert_eq!(apply(&mut config, "redis_port", &json!(6379))?, Applied::Set);
        assert_eq!(config.cache.port, 6379);
        Ok(())
    }

    #[test]
    fn unparsable_numbers_reset_field_to_zero() -> ConfigResult<()> {
        let mut config = Configuration::default();
        assert_eq!(apply(&mut config, "db_port", &json!("abc"))?, Applied::Unparsed);
        assert_eq!(config.database.write.port, 0);

        for bad in ["-1", "4294967296", ""] {
            apply(&mut config, "redis_db_index", &json!("3"))?;
            assert_eq!(
                apply(&mut config, "redis_db_index", &json!(bad))?,
                Applied::Unparsed
            );
            assert_eq!(config.cache.db_index, 0, "{bad:?} kept the earlier value");
        }
        Ok(())
    }

    #[test]
    fn later_unparsable_number_clears_earlier_value() -> ConfigResult<()> {
        let mut config = Configuration::default();
        apply_key(&mut config, SecretGroup::Global, "db_port", &json!("5432"))?;
        apply_key(&mut config, SecretGroup::Db, "db_port", &json!("abc"))?;
        assert_eq!(config.database.write.port, 0);
        Ok(())
    }

    #[test]
    fn signed_or_padded_numbers_are_unparsed() -> ConfigResult<()> {
        let mut config = Configuration::default();
        for bad in ["+5432", " 5432", "5432 ", "5_432"] {
            assert_eq!(apply(&mut config, "db_port", &json!(bad))?, Applied::Unparsed);
            assert_eq!(config.database.write.port, 0);
        }
        Ok(())
    }

    #[test]
    fn path_style_flag_is_set_by_presence() -> ConfigResult<()> {
        let mut config = Configuration::default();
        apply(&mut config, "aws_s3_force_path_style", &json!(false))?;
        assert!(config.artifacts.object_storage.force_path_style);

        let mut config = Configuration::default();
        apply(&mut config, "AWS_S3_FORCE_PATH_STYLE", &Value::Null)?;
        assert!(config.artifacts.object_storage.force_path_style);
        Ok(())
    }

    #[test]
    fn unknown_keys_are_ignored() -> ConfigResult<()> {
        let mut config = Configuration::default();
        assert_eq!(
            apply(&mut config, "smtp_password", &json!(["anything"]))?,
            Applied::Ignored
        );
        assert_eq!(config, Configuration::default());
        Ok(())
    }

    #[test]
    fn wrong_json_type_is_reported() {
        let mut config = Configuration::default();
        let err = apply_key(&mut config, SecretGroup::Tenant, "TENANT_NAME", &json!(42))
            .unwrap_err();
        match err {
            ConfigError::InvalidValue {
                variable,
                key,
                expected,
            } => {
                assert_eq!(variable, "tenant_secrets");
                assert_eq!(key, "tenant_name");
                assert_eq!(expected, EXPECTED_STRING);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = apply(&mut config, "db_port", &json!(true)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn local_save_path_is_routed() -> ConfigResult<()> {
        let mut config = Configuration::default();
        apply(&mut config, "local_build_save_path", &json!("/srv/bundles"))?;
        assert_eq!(config.artifacts.local.save_path, "/srv/bundles");
        Ok(())
    }
}
