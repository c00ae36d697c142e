//! One-shot load of the configuration from secret groups.
//!
//! # Design
//! - Defaults first, then each group in fixed order, then validation.
//! - Absent groups are logged and skipped; malformed ones abort the load.
//! - Only key names are logged, never values.

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::keys::{Applied, apply_key};
use crate::model::Configuration;
use crate::source::{ProcessEnv, SecretGroup, SecretSource};
use crate::validate::validate;

/// Builds a validated [`Configuration`] from a [`SecretSource`].
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader<S> {
    source: S,
}

impl<S: SecretSource> ConfigLoader<S> {
    /// Wrap `source` in a loader.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Access the underlying secret source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Run the full load: defaults, every secret group in order, validation.
    ///
    /// Each call re-reads the source; caching is the job of [`crate::ConfigCell`].
    ///
    /// # Errors
    ///
    /// Returns an error if a group is not a JSON object, a recognized key has
    /// the wrong JSON type, or required fields are missing after the merge.
    #[instrument(name = "config_loader.load", skip(self))]
    pub fn load(&self) -> ConfigResult<Configuration> {
        let mut config = Configuration::default();

        for group in SecretGroup::ALL {
            let Some(secrets) = self.read_group(group)? else {
                continue;
            };
            merge_group(&mut config, group, &secrets)?;
        }

        validate(&config)?;

        let backend = config.artifacts.backend();
        info!(
            environment = %config.environment,
            tenant = %config.tenant_name,
            backend = backend.as_str(),
            "configuration loaded"
        );
        Ok(config)
    }

    fn read_group(&self, group: SecretGroup) -> ConfigResult<Option<Map<String, Value>>> {
        let variable = group.variable();
        let Some(raw) = self.source.lookup(variable)? else {
            info!(variable, "no secrets found; skipping group");
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| ConfigError::MalformedSource { variable, source })
    }
}

/// Load the configuration from the process environment.
///
/// Not cached; use [`crate::get_configuration`] for the process-wide instance.
///
/// # Errors
///
/// See [`ConfigLoader::load`].
pub fn load_configuration() -> ConfigResult<Configuration> {
    ConfigLoader::new(ProcessEnv).load()
}

fn merge_group(
    config: &mut Configuration,
    group: SecretGroup,
    secrets: &Map<String, Value>,
) -> ConfigResult<()> {
    let variable = group.variable();
    let mut applied = 0_usize;

    for (key, value) in secrets {
        match apply_key(config, group, key, value)? {
            Applied::Set => {
                debug!(variable, key = %key, "applied secret key");
                applied += 1;
            }
            Applied::Ignored => debug!(variable, key = %key, "ignoring unrecognized key"),
            // Tolerated: the field is left at zero.
            Applied::Unparsed => warn!(
                variable,
                key = %key,
                "numeric secret did not parse as an unsigned integer; field reset to zero"
            ),
        }
    }

    debug!(variable, applied, total = secrets.len(), "merged secret group");
    Ok(())
}
