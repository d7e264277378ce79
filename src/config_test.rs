use super::*;

use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Safety
/// Callers must hold `env_lock()` so env mutations do not race.
unsafe fn clear_auth_env() {
    unsafe {
        std::env::remove_var("AUTH_STORAGE_KEY");
        std::env::remove_var("AUTH_USER_COOKIE");
        std::env::remove_var("AUTH_PERSIST_VERSION");
    }
}

#[test]
fn default_matches_documented_values() {
    let cfg = AuthConfig::default();
    assert_eq!(cfg.storage_key, "auth-storage");
    assert_eq!(cfg.cookie_name, DEFAULT_USER_COOKIE);
    assert_eq!(cfg.persist_version, 0);
}

#[test]
fn from_env_reads_overrides() {
    let _guard = env_lock();
    unsafe {
        clear_auth_env();
        std::env::set_var("AUTH_STORAGE_KEY", "acme-auth");
        std::env::set_var("AUTH_USER_COOKIE", " acme_user ");
        std::env::set_var("AUTH_PERSIST_VERSION", "3");
    }

    let cfg = AuthConfig::from_env().unwrap();
    assert_eq!(cfg.storage_key, "acme-auth");
    assert_eq!(cfg.cookie_name, "acme_user");
    assert_eq!(cfg.persist_version, 3);

    unsafe { clear_auth_env() };
}

#[test]
fn from_env_defaults_storage_key_and_version() {
    let _guard = env_lock();
    unsafe {
        clear_auth_env();
        std::env::set_var("AUTH_USER_COOKIE", "acme_user");
    }

    let cfg = AuthConfig::from_env().unwrap();
    assert_eq!(cfg.storage_key, DEFAULT_STORAGE_KEY);
    assert_eq!(cfg.persist_version, DEFAULT_PERSIST_VERSION);

    unsafe { clear_auth_env() };
}

#[test]
fn from_env_rejects_empty_cookie_name() {
    let _guard = env_lock();
    unsafe {
        clear_auth_env();
        std::env::set_var("AUTH_USER_COOKIE", "  ");
    }

    let err = AuthConfig::from_env().unwrap_err().to_string();
    assert_eq!(err, "AUTH_USER_COOKIE must not be empty");

    unsafe { clear_auth_env() };
}

#[test]
fn from_env_rejects_bad_version() {
    let _guard = env_lock();
    unsafe {
        clear_auth_env();
        std::env::set_var("AUTH_PERSIST_VERSION", "v2");
    }

    let err = AuthConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("invalid AUTH_PERSIST_VERSION"));

    unsafe { clear_auth_env() };
}

#[test]
fn parse_version_trims() {
    assert_eq!(parse_version(" 7 ").unwrap(), 7);
    assert!(parse_version("-1").is_err());
}

#[test]
fn env_value_falls_back_to_baked_value() {
    let _guard = env_lock();
    unsafe { std::env::remove_var("AUTH_TEST_BAKED_ONLY") };

    assert_eq!(env_value("AUTH_TEST_BAKED_ONLY", Some(" acme-auth ")).unwrap().as_deref(), Some("acme-auth"));
    assert_eq!(env_value("AUTH_TEST_BAKED_ONLY", Some("  ")).unwrap(), None);
    assert_eq!(env_value("AUTH_TEST_BAKED_ONLY", None).unwrap(), None);
}

#[test]
fn env_value_prefers_runtime_over_baked() {
    let _guard = env_lock();
    unsafe { std::env::set_var("AUTH_TEST_RUNTIME", "runtime-key") };

    assert_eq!(env_value("AUTH_TEST_RUNTIME", Some("baked-key")).unwrap().as_deref(), Some("runtime-key"));

    unsafe { std::env::remove_var("AUTH_TEST_RUNTIME") };
}
