//! Tests that read the real process environment. They share global state and
//! run serially.

use std::env;

use codepush_config::{ConfigError, get_configuration, load_configuration, try_get_configuration};
use codepush_test_support::fixtures::{GROUP_VARIABLES, SecretsFixture};
use serde_json::json;
use serial_test::serial;

fn install(fixture: &SecretsFixture) {
    for variable in GROUP_VARIABLES {
        // SAFETY: every test in this binary is `#[serial]`, so no other thread
        // reads or writes the environment concurrently.
        unsafe { env::remove_var(variable) };
    }
    for (variable, payload) in fixture.entries() {
        // SAFETY: see above.
        unsafe { env::set_var(variable, payload) };
    }
}

#[test]
#[serial]
fn load_configuration_reads_process_environment() -> anyhow::Result<()> {
    install(&SecretsFixture::complete());
    let config = load_configuration()?;
    assert_eq!(config.tenant_name, "acme");
    assert_eq!(config.database.write.port, 5432);
    Ok(())
}

#[test]
#[serial]
fn load_configuration_rejects_malformed_variable() {
    install(&SecretsFixture::complete().with_raw("db_secrets", "{not valid json"));
    let err = load_configuration().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MalformedSource {
            variable: "db_secrets",
            ..
        }
    ));
}

#[test]
#[serial]
fn accessor_caches_first_load() -> anyhow::Result<()> {
    install(&SecretsFixture::complete());
    let first = try_get_configuration()?;

    install(&SecretsFixture::complete().with_key("db_secrets", "environment", json!("prod")));
    let second = get_configuration();

    assert!(std::ptr::eq(first, second));
    assert_eq!(second.environment, "staging");
    Ok(())
}
