//! One-time initialisation of the process-wide configuration.
//!
//! # Design
//! - `ConfigCell` wraps a `OnceCell` so the load runs at most once and every
//!   caller shares the same fully built instance.
//! - The process-wide cell is private; tests build their own cells instead of
//!   resetting global state.
//! - A failed load is fatal: the process exits after logging the error.

use std::process;

use once_cell::sync::OnceCell;
use tracing::error;

use crate::error::ConfigResult;
use crate::loader::load_configuration;
use crate::model::Configuration;

static GLOBAL: ConfigCell = ConfigCell::new();

/// Lazily initialised, shared configuration slot.
#[derive(Debug, Default)]
pub struct ConfigCell {
    inner: OnceCell<Configuration>,
}

impl ConfigCell {
    /// Create an empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: OnceCell::new(),
        }
    }

    /// The cached configuration, if a load has completed.
    #[must_use]
    pub fn get(&self) -> Option<&Configuration> {
        self.inner.get()
    }

    /// Return the cached configuration, running `load` if none is cached yet.
    ///
    /// Concurrent first callers block until a single `load` finishes and then
    /// observe the same instance. A failed `load` leaves the cell empty.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `load`.
    pub fn get_or_load<F>(&self, load: F) -> ConfigResult<&Configuration>
    where
        F: FnOnce() -> ConfigResult<Configuration>,
    {
        self.inner.get_or_try_init(load)
    }
}

/// Load the process-wide configuration on first use and return it.
///
/// # Errors
///
/// Returns the load error; the next call retries the load.
pub fn try_get_configuration() -> ConfigResult<&'static Configuration> {
    GLOBAL.get_or_load(load_configuration)
}

/// Process-wide configuration, loaded from the environment on first call.
///
/// Any load failure is fatal: it is logged and the process exits with status 1.
#[must_use]
pub fn get_configuration() -> &'static Configuration {
    match try_get_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid/missing configuration; aborting startup");
            eprintln!("config: {err}");
            process::exit(1)
        }
    }
}
