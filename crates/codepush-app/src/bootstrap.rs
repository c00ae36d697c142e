use std::error::Error;
use std::fmt::Write as _;

use codepush_config::{ConfigLoader, Configuration, SecretSource, try_get_configuration};
use codepush_telemetry::LoggingConfig;
use tracing::{error, info};

use crate::error::{AppError, AppResult};

/// Non-secret facts about the loaded configuration, logged at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupSummary {
    /// Deployment environment name.
    pub environment: String,
    /// Tenant this process serves.
    pub tenant: String,
    /// HTTP listen address.
    pub listen: String,
    /// Selected artifact delivery backend.
    pub backend: String,
}

impl StartupSummary {
    /// Extract the summary from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Configuration) -> Self {
        Self {
            environment: config.environment.clone(),
            tenant: config.tenant_name.clone(),
            listen: config.port.clone(),
            backend: config.artifacts.backend().as_str().to_string(),
        }
    }

    fn log(&self) {
        info!(
            environment = %self.environment,
            tenant = %self.tenant,
            listen = %self.listen,
            backend = %self.backend,
            "configuration ready"
        );
    }
}

/// Entry point for the codepush boot sequence.
///
/// Installs logging from `RUST_LOG`/`LOG_FORMAT`, then forces the
/// process-wide configuration load.
///
/// # Errors
///
/// Returns an error if logging cannot be installed or the configuration is
/// malformed or incomplete.
pub fn run_app() -> AppResult<()> {
    codepush_telemetry::init_logging(&LoggingConfig::from_env())
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    info!(
        build_sha = codepush_telemetry::build_sha(),
        "codepush bootstrap starting"
    );

    let config = try_get_configuration().map_err(|err| {
        error!(error = %err, "invalid/missing configuration");
        AppError::config("config.load", err)
    })?;
    StartupSummary::from_config(config).log();
    Ok(())
}

/// Boot sequence over an injected secret source, without touching the
/// process-wide cache. Logging must already be installed if wanted.
///
/// # Errors
///
/// Returns an error if the configuration is malformed or incomplete.
pub fn run_app_with<S: SecretSource>(source: S) -> AppResult<StartupSummary> {
    let config = ConfigLoader::new(source)
        .load()
        .map_err(|err| AppError::config("config.load", err))?;
    let summary = StartupSummary::from_config(&config);
    summary.log();
    Ok(summary)
}

/// Render `err` and its source chain as one diagnostic line.
#[must_use]
pub fn report(err: &AppError) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(rendered, ": {cause}");
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepush_config::StaticSecrets;

    #[test]
    fn report_includes_source_chain() {
        let err = AppError::config(
            "config.load",
            codepush_config::ConfigError::Validation {
                violations: vec![codepush_config::FieldViolation::new(
                    "tenant_name",
                    "missing",
                )],
            },
        );
        assert_eq!(
            report(&err),
            "configuration operation failed: invalid/missing configuration: tenant_name (missing)"
        );
    }

    #[test]
    fn run_app_with_empty_source_fails() {
        let err = run_app_with(StaticSecrets::new()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config {
                operation: "config.load",
                ..
            }
        ));
    }
}
