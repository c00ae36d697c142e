//! Secret group payloads for configuration tests.
//!
//! Fixtures are plain `(variable, json)` pairs so they can feed either an
//! in-memory secret source or the real process environment.

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

/// Variable names of the four secret groups, in merge order.
pub const GROUP_VARIABLES: [&str; 4] = [
    "global_secrets",
    "tenant_secrets",
    "service_secrets",
    "db_secrets",
];

/// Editable set of secret group payloads.
#[derive(Debug, Clone, Default)]
pub struct SecretsFixture {
    groups: BTreeMap<&'static str, Group>,
}

#[derive(Debug, Clone)]
enum Group {
    Object(Map<String, Value>),
    Raw(String),
}

impl SecretsFixture {
    /// No groups set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Groups that together satisfy every required field, using local delivery.
    #[must_use]
    pub fn complete() -> Self {
        Self::empty()
            .with_object(
                "global_secrets",
                json!({
                    "redis_host": "cache.internal",
                    "redis_port": "6379",
                    "build_save_location": "local",
                    "local_build_save_path": "/srv/bundles",
                    "resource_url": "https://cdn.example.com",
                    "environment": "staging",
                }),
            )
            .with_object("tenant_secrets", json!({ "tenant_name": "acme" }))
            .with_object(
                "service_secrets",
                json!({ "ftp_server_url": "ftp://files.example.com" }),
            )
            .with_object(
                "db_secrets",
                json!({
                    "db_username": "codepush",
                    "db_password": "db-secret",
                    "db_host": "db.internal",
                    "db_port": "5432",
                    "db_name": "codepush",
                }),
            )
    }

    /// Object storage keys that satisfy the S3 backend's required fields.
    #[must_use]
    pub fn object_storage_keys() -> Value {
        json!({
            "build_save_location": "aws",
            "aws_s3_endpoint": "https://s3.example.com",
            "aws_region": "eu-west-1",
            "aws_s3_force_path_style": "true",
            "aws_access_key_id": "AKIAEXAMPLE",
            "aws_secret_access_key": "aws-secret",
            "aws_s3_bucket_name": "bundles",
        })
    }

    /// Replace `variable` with a JSON object. Non-object values become empty objects.
    #[must_use]
    pub fn with_object(mut self, variable: &'static str, payload: Value) -> Self {
        let map = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.groups.insert(variable, Group::Object(map));
        self
    }

    /// Replace `variable` with raw text, which need not be valid JSON.
    #[must_use]
    pub fn with_raw(mut self, variable: &'static str, payload: impl Into<String>) -> Self {
        self.groups.insert(variable, Group::Raw(payload.into()));
        self
    }

    /// Set `key` inside the object group `variable`, creating the group if needed.
    #[must_use]
    pub fn with_key(mut self, variable: &'static str, key: &str, value: Value) -> Self {
        let entry = self
            .groups
            .entry(variable)
            .or_insert_with(|| Group::Object(Map::new()));
        match entry {
            Group::Object(map) => {
                map.insert(key.to_string(), value);
            }
            Group::Raw(_) => {
                let mut map = Map::new();
                map.insert(key.to_string(), value);
                *entry = Group::Object(map);
            }
        }
        self
    }

    /// Remove `key` from every object group.
    #[must_use]
    pub fn without_key(mut self, key: &str) -> Self {
        for group in self.groups.values_mut() {
            if let Group::Object(map) = group {
                map.remove(key);
            }
        }
        self
    }

    /// Drop the whole group `variable` so it reads as absent.
    #[must_use]
    pub fn without_group(mut self, variable: &str) -> Self {
        self.groups.remove(variable);
        self
    }

    /// `(variable, payload)` pairs for every group that is set.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        self.groups
            .iter()
            .map(|(variable, group)| {
                let payload = match group {
                    Group::Object(map) => Value::Object(map.clone()).to_string(),
                    Group::Raw(raw) => raw.clone(),
                };
                (*variable, payload)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(fixture: &SecretsFixture, variable: &str) -> Option<String> {
        fixture
            .entries()
            .into_iter()
            .find(|(name, _)| *name == variable)
            .map(|(_, payload)| payload)
    }

    #[test]
    fn complete_fixture_sets_every_group() {
        let fixture = SecretsFixture::complete();
        let names: Vec<_> = fixture.entries().into_iter().map(|(name, _)| name).collect();
        for variable in GROUP_VARIABLES {
            assert!(names.contains(&variable), "{variable} missing");
        }
    }

    #[test]
    fn key_edits_apply_to_objects() {
        let fixture = SecretsFixture::complete()
            .without_key("tenant_name")
            .with_key("db_secrets", "environment", json!("prod"));
        assert_eq!(payload(&fixture, "tenant_secrets").as_deref(), Some("{}"));
        let db: Value =
            serde_json::from_str(&payload(&fixture, "db_secrets").unwrap_or_default())
                .unwrap_or_default();
        assert_eq!(db["environment"], "prod");
    }

    #[test]
    fn raw_payloads_are_passed_through() {
        let fixture = SecretsFixture::empty().with_raw("db_secrets", "{not valid json");
        assert_eq!(
            payload(&fixture, "db_secrets").as_deref(),
            Some("{not valid json")
        );
        assert!(payload(&fixture.without_group("db_secrets"), "db_secrets").is_none());
    }
}
