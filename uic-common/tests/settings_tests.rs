//! Settings resolution tests
//!
//! Note: Uses serial_test to prevent ENV variable race conditions.
//! Every test here manipulates UIC_* variables and is marked with
//! #[serial] so they run sequentially, not in parallel.

use serial_test::serial;
use std::path::PathBuf;
use uic_common::config::{Language, Overrides, Settings};

const TEST_SALT: &str = "unit-test-salt-0123456789";

fn clear_env() {
    for var in [
        "UIC_BIND_ADDR",
        "UIC_DATABASE_PATH",
        "UIC_SALT",
        "UIC_SESSION_TIMEOUT_MINUTES",
        "UIC_APPEND_HASH_SUFFIX",
        "UIC_DEFAULT_LANGUAGE",
    ] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn missing_salt_is_a_config_error() {
    clear_env();
    let err = Settings::load(Overrides::default()).unwrap_err();
    assert!(err.to_string().contains("UIC_SALT"));
}

#[test]
#[serial]
fn defaults_apply_when_only_salt_is_set() {
    clear_env();
    std::env::set_var("UIC_SALT", TEST_SALT);

    let settings = Settings::load(Overrides::default()).expect("load");
    assert_eq!(settings.bind_addr, "0.0.0.0:8000");
    assert_eq!(settings.database_path, PathBuf::from("./uic.db"));
    assert_eq!(settings.session_timeout_minutes, 15);
    assert!(!settings.append_hash_suffix);
    assert_eq!(settings.default_language, Language::Fr);
}

#[test]
#[serial]
fn env_overrides_defaults() {
    clear_env();
    std::env::set_var("UIC_SALT", TEST_SALT);
    std::env::set_var("UIC_BIND_ADDR", "127.0.0.1:9999");
    std::env::set_var("UIC_DATABASE_PATH", "/tmp/uic-test.db");
    std::env::set_var("UIC_SESSION_TIMEOUT_MINUTES", "30");
    std::env::set_var("UIC_APPEND_HASH_SUFFIX", "true");
    std::env::set_var("UIC_DEFAULT_LANGUAGE", "en");

    let settings = Settings::load(Overrides::default()).expect("load");
    assert_eq!(settings.bind_addr, "127.0.0.1:9999");
    assert_eq!(settings.database_path, PathBuf::from("/tmp/uic-test.db"));
    assert_eq!(settings.session_timeout_minutes, 30);
    assert!(settings.append_hash_suffix);
    assert_eq!(settings.default_language, Language::En);
}

#[test]
#[serial]
fn cli_overrides_beat_environment() {
    clear_env();
    std::env::set_var("UIC_SALT", TEST_SALT);
    std::env::set_var("UIC_BIND_ADDR", "127.0.0.1:9999");
    std::env::set_var("UIC_DATABASE_PATH", "/tmp/env.db");

    let overrides = Overrides {
        database_path: Some(PathBuf::from("/tmp/cli.db")),
        bind_addr: Some("127.0.0.1:8080".to_string()),
    };
    let settings = Settings::load(overrides).expect("load");
    assert_eq!(settings.bind_addr, "127.0.0.1:8080");
    assert_eq!(settings.database_path, PathBuf::from("/tmp/cli.db"));
}

#[test]
#[serial]
fn invalid_timeout_is_rejected() {
    clear_env();
    std::env::set_var("UIC_SALT", TEST_SALT);
    std::env::set_var("UIC_SESSION_TIMEOUT_MINUTES", "not-a-number");
    assert!(Settings::load(Overrides::default()).is_err());

    std::env::set_var("UIC_SESSION_TIMEOUT_MINUTES", "0");
    assert!(Settings::load(Overrides::default()).is_err());
}
