//! Secret groups and the environment they are read from.
//!
//! # Design
//! - Groups are merged in a fixed order; later groups overwrite earlier ones.
//! - `SecretSource` is the seam between the loader and the process environment,
//!   so tests and embedders can supply secrets without touching global state.

use std::collections::HashMap;
use std::env::{self, VarError};

use crate::error::{ConfigError, ConfigResult};

/// Named secret group, one per environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretGroup {
    /// Secrets shared by every service.
    Global,
    /// Tenant-specific secrets.
    Tenant,
    /// Service-specific secrets.
    Service,
    /// Database credentials.
    Db,
}

impl SecretGroup {
    /// Every group in merge order.
    pub const ALL: [Self; 4] = [Self::Global, Self::Tenant, Self::Service, Self::Db];

    /// Group name as used in the variable prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Tenant => "tenant",
            Self::Service => "service",
            Self::Db => "db",
        }
    }

    /// Environment variable holding the group's JSON object.
    #[must_use]
    pub const fn variable(self) -> &'static str {
        match self {
            Self::Global => "global_secrets",
            Self::Tenant => "tenant_secrets",
            Self::Service => "service_secrets",
            Self::Db => "db_secrets",
        }
    }
}

/// Lookup of raw secret group payloads by variable name.
pub trait SecretSource {
    /// Return the raw value of `variable`, or `None` when it is not set.
    ///
    /// # Errors
    ///
    /// Returns an error when the variable is set but cannot be read as text.
    fn lookup(&self, variable: &'static str) -> ConfigResult<Option<String>>;
}

impl<S: SecretSource + ?Sized> SecretSource for &S {
    fn lookup(&self, variable: &'static str) -> ConfigResult<Option<String>> {
        (**self).lookup(variable)
    }
}

/// Reads secret groups from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl SecretSource for ProcessEnv {
    fn lookup(&self, variable: &'static str) -> ConfigResult<Option<String>> {
        match env::var(variable) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::NonUnicodeSource { variable }),
        }
    }
}

/// In-memory secret groups keyed by variable name.
#[derive(Debug, Clone, Default)]
pub struct StaticSecrets {
    values: HashMap<String, String>,
}

impl StaticSecrets {
    /// Create an empty source; every group reads as absent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw payload for `variable`, replacing any previous value.
    #[must_use]
    pub fn with(mut self, variable: impl Into<String>, payload: impl Into<String>) -> Self {
        self.insert(variable, payload);
        self
    }

    /// Set the raw payload for `variable` in place.
    pub fn insert(&mut self, variable: impl Into<String>, payload: impl Into<String>) {
        self.values.insert(variable.into(), payload.into());
    }

    /// Remove the payload for `variable` so it reads as absent.
    pub fn remove(&mut self, variable: &str) {
        self.values.remove(variable);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticSecrets {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(variable, payload)| (variable.into(), payload.into()))
                .collect(),
        }
    }
}

impl SecretSource for StaticSecrets {
    fn lookup(&self, variable: &'static str) -> ConfigResult<Option<String>> {
        Ok(self.values.get(variable).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_merge_in_fixed_order() {
        let names: Vec<_> = SecretGroup::ALL.iter().map(|g| g.variable()).collect();
        assert_eq!(
            names,
            vec![
                "global_secrets",
                "tenant_secrets",
                "service_secrets",
                "db_secrets"
            ]
        );
        assert_eq!(SecretGroup::Db.as_str(), "db");
    }

    #[test]
    fn static_secrets_lookup_and_remove() -> ConfigResult<()> {
        let mut secrets = StaticSecrets::new().with("db_secrets", "{}");
        assert_eq!(secrets.lookup("db_secrets")?, Some("{}".to_string()));
        assert_eq!(secrets.lookup("global_secrets")?, None);

        secrets.remove("db_secrets");
        assert_eq!(secrets.lookup("db_secrets")?, None);
        Ok(())
    }

    #[test]
    fn static_secrets_collect_from_pairs() -> ConfigResult<()> {
        let secrets: StaticSecrets =
            std::iter::once(("tenant_secrets", r#"{"tenant_name":"acme"}"#)).collect();
        let by_ref = &secrets;
        assert!(by_ref.lookup("tenant_secrets")?.is_some());
        Ok(())
    }

    #[test]
    fn process_env_reports_missing_variable_as_absent() -> ConfigResult<()> {
        assert_eq!(
            ProcessEnv.lookup("codepush_definitely_unset_secrets")?,
            None
        );
        Ok(())
    }
}
