use std::sync::Mutex;
use std::time::Duration;
use xhr_shim::config::{Config, DEFAULT_ACCEPT, DEFAULT_USER_AGENT};

// Config::load() reads process-wide env vars; serialize the tests that
// touch them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_config_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        std::env::remove_var("XHR_USER_AGENT");
        std::env::remove_var("XHR_ACCEPT");
        std::env::remove_var("XHR_CONNECT_TIMEOUT_MS");
    }
    let cfg = Config::load();
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.accept, DEFAULT_ACCEPT);
    assert_eq!(cfg.connect_timeout(), Duration::from_millis(5000));
}

#[test]
fn test_config_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        std::env::set_var("XHR_USER_AGENT", "embedded-host/2.1");
        std::env::set_var("XHR_ACCEPT", "application/json");
        std::env::set_var("XHR_CONNECT_TIMEOUT_MS", "250");
    }
    let cfg = Config::load();
    assert_eq!(cfg.user_agent, "embedded-host/2.1");
    assert_eq!(cfg.accept, "application/json");
    assert_eq!(cfg.connect_timeout(), Duration::from_millis(250));
    unsafe {
        std::env::remove_var("XHR_USER_AGENT");
        std::env::remove_var("XHR_ACCEPT");
        std::env::remove_var("XHR_CONNECT_TIMEOUT_MS");
    }
}

#[test]
fn test_config_invalid_timeout_env_falls_back() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        std::env::set_var("XHR_CONNECT_TIMEOUT_MS", "not-a-number");
    }
    let cfg = Config::load();
    assert_eq!(cfg.connect_timeout(), Duration::from_millis(5000));
    unsafe {
        std::env::remove_var("XHR_CONNECT_TIMEOUT_MS");
    }
}

#[test]
fn test_config_from_json() {
    let cfg = Config::from_json(r#"{"user_agent": "host/1.0", "connect_timeout_ms": 100}"#).unwrap();
    assert_eq!(cfg.user_agent, "host/1.0");
    assert_eq!(cfg.accept, DEFAULT_ACCEPT); // omitted fields use defaults
    assert_eq!(cfg.connect_timeout_ms, 100);
}

#[test]
fn test_config_from_json_rejects_garbage() {
    assert!(Config::from_json("not json").is_err());
}

#[test]
fn test_config_default_headers_seed() {
    let cfg = Config::default();
    let headers = cfg.default_headers();
    assert_eq!(headers.get("User-Agent").unwrap(), DEFAULT_USER_AGENT);
    assert_eq!(headers.get("Accept").unwrap(), DEFAULT_ACCEPT);
    assert_eq!(headers.len(), 2);
}

#[test]
fn test_config_default_headers_are_independent_copies() {
    let cfg = Config::default();
    let mut first = cfg.default_headers();
    first.insert("X-Extra".to_string(), "1".to_string());
    let second = cfg.default_headers();
    assert!(!second.contains_key("X-Extra"));
}
